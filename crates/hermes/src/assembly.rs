//! Building controllers from [`HermesConfig`].

use crate::error::BuildError;
use hermes_codec::{media, Codec, CodecDecoding, DecoderFactory, FormCodec, JsonCodec};
use hermes_config::{HermesConfig, QueryPlacement};
use hermes_pipeline::{Controller, ControllerBuilder, Validator};
use std::sync::Arc;

fn codec_for(field: &'static str, media_type: &str) -> Result<Arc<dyn Codec>, BuildError> {
    match media::essence(media_type).as_str() {
        JsonCodec::MEDIA_TYPE => Ok(Arc::new(JsonCodec::new())),
        FormCodec::MEDIA_TYPE => Ok(Arc::new(FormCodec::new())),
        _ => Err(BuildError::UnknownMediaType {
            field,
            media_type: media_type.to_string(),
        }),
    }
}

fn decoder_for(
    field: &'static str,
    media_type: &str,
) -> Result<Arc<dyn DecoderFactory>, BuildError> {
    match media::essence(media_type).as_str() {
        JsonCodec::MEDIA_TYPE => Ok(Arc::new(CodecDecoding::json())),
        FormCodec::MEDIA_TYPE => Ok(Arc::new(CodecDecoding::form())),
        _ => Err(BuildError::UnknownMediaType {
            field,
            media_type: media_type.to_string(),
        }),
    }
}

/// Prepares a [`ControllerBuilder`] from configuration.
///
/// The configuration is validated first. The returned builder can still
/// take custom steps and a validator; custom steps land after the
/// configured query and body steps unless `body_decode` is called again.
///
/// # Errors
///
/// Returns [`BuildError::Config`] if validation fails and
/// [`BuildError::UnknownMediaType`] for a media type without a built-in
/// codec.
pub fn controller_builder_from_config(
    config: &HermesConfig,
) -> Result<ControllerBuilder, BuildError> {
    config.validate()?;

    let mut builder = ControllerBuilder::new(codec_for("codecs.default", &config.codecs.default)?);
    for alternate in &config.codecs.alternates {
        builder = builder.alternate_shared(codec_for("codecs.alternates", alternate)?);
    }
    for decoder in &config.codecs.decoders {
        builder = builder.decoder_shared(decoder_for("codecs.decoders", decoder)?);
    }

    builder = match config.ingress.query {
        QueryPlacement::Disabled => builder,
        QueryPlacement::BeforeBody => builder
            .query_decode(CodecDecoding::form())
            .body_decode(),
        QueryPlacement::AfterBody => builder
            .body_decode()
            .query_decode(CodecDecoding::form()),
    };

    Ok(builder
        .max_body_bytes(config.ingress.max_body_bytes)
        .charset(config.egress.charset.clone())
        .fallback_body(config.egress.fallback_body.clone()))
}

/// Builds a [`Controller`] from configuration with an optional validator.
///
/// # Errors
///
/// See [`controller_builder_from_config`]; duplicate registrations are
/// reported as [`BuildError::Stack`].
///
/// # Example
///
/// ```
/// use hermes::{controller_from_config, HermesConfig};
///
/// let controller = controller_from_config(&HermesConfig::default(), None).unwrap();
/// assert_eq!(
///     controller.ingress().step_names().collect::<Vec<_>>(),
///     ["query_decode", "body_decode"]
/// );
/// ```
pub fn controller_from_config(
    config: &HermesConfig,
    validator: Option<Arc<dyn Validator>>,
) -> Result<Controller, BuildError> {
    let mut builder = controller_builder_from_config(config)?;
    if let Some(validator) = validator {
        builder = builder.validator_shared(validator);
    }

    let controller = builder.build()?;
    tracing::info!(
        default_codec = %config.codecs.default,
        query = %config.ingress.query,
        max_body_bytes = config.ingress.max_body_bytes,
        "controller assembled from configuration"
    );
    Ok(controller)
}

/// Installs the global logging subscriber described by `config.logging`.
///
/// # Errors
///
/// Returns [`BuildError::Telemetry`] for a bad filter or when a subscriber
/// is already installed.
pub fn init_logging(config: &HermesConfig) -> Result<(), BuildError> {
    hermes_telemetry::init_logging(&config.logging.to_log_config())?;
    Ok(())
}
