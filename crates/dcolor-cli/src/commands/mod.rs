//! CLI command implementations

pub mod map;
pub mod pipeline;
pub mod shader;
pub mod uniforms;

use anyhow::{Context, Result, bail};
use tracing::debug;

use dcolor_pipeline::{ColorDescription, ColorPipeline, PipelineConfig};
use dcolor_primaries::{Colorimetry, NamedColorimetry};
use dcolor_transfer::{TransferFunction, TransferFunctionType};

use crate::ConversionArgs;

/// Luminance overrides from the command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct LuminanceOverrides {
    pub reference: Option<f32>,
    pub min: Option<f32>,
    pub max: Option<f32>,
}

/// Parses `<colorimetry>:<transfer>` or a preset name.
pub fn parse_description(text: &str, overrides: LuminanceOverrides) -> Result<ColorDescription> {
    let base = match text.to_ascii_lowercase().as_str() {
        "srgb" => ColorDescription::srgb(),
        "hdr10" | "bt2100-pq" | "bt2100" => ColorDescription::bt2100_pq(),
        _ => {
            let Some((colorimetry, transfer)) = text.split_once(':') else {
                bail!("Invalid description '{}': expected <colorimetry>:<transfer> or a preset (srgb, hdr10)", text);
            };
            let name: NamedColorimetry = colorimetry
                .parse()
                .with_context(|| format!("Invalid description '{}'", text))?;
            let ty: TransferFunctionType = transfer
                .parse()
                .with_context(|| format!("Invalid description '{}'", text))?;
            ColorDescription::from_transfer_function(Colorimetry::from_name(name), TransferFunction::new(ty))
        }
    };

    // Relative curves follow a new reference: encoded 1 stays at the same
    // multiple of white. PQ and HLG keep their absolute nit range.
    let tf = base.transfer_function();
    let factor = match (overrides.reference, tf.ty()) {
        (_, TransferFunctionType::PerceptualQuantizer | TransferFunctionType::Hlg) => 1.0,
        (Some(reference), _) if reference.is_finite() && reference > 0.0 => reference / base.reference_luminance(),
        _ => 1.0,
    };
    if factor != 1.0 {
        debug!(%tf, factor, "scaling relative transfer function to reference");
    }

    let max = overrides.max.or(base.max_hdr_luminance().map(|m| m * factor));
    Ok(ColorDescription::new(
        *base.colorimetry(),
        tf.scaled(factor),
        overrides.reference.unwrap_or(base.reference_luminance()),
        overrides.min.unwrap_or(base.min_luminance() * factor),
        base
            .max_average_luminance()
            .map(|avg| avg * factor)
            .map(|avg| max.map_or(avg, |m| avg.min(m))),
        max,
    ))
}

/// Builds the pipeline described by `args`.
pub fn build_pipeline(args: &ConversionArgs, config: &PipelineConfig) -> Result<(ColorDescription, ColorDescription, ColorPipeline)> {
    let from = parse_description(
        &args.from,
        LuminanceOverrides {
            reference: args.from_ref,
            min: args.from_min,
            max: args.from_max,
        },
    )?;
    let to = parse_description(
        &args.to,
        LuminanceOverrides {
            reference: args.to_ref,
            min: args.to_min,
            max: args.to_max,
        },
    )?;
    debug!(%from, %to, intent = %args.intent, "building pipeline");
    let pipeline = ColorPipeline::create_with_config(&from, &to, args.intent, config);
    Ok((from, to, pipeline))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_presets() {
        let d = parse_description("hdr10", LuminanceOverrides::default()).unwrap();
        assert_eq!(d, ColorDescription::bt2100_pq());
        let d = parse_description("sRGB", LuminanceOverrides::default()).unwrap();
        assert_eq!(d, ColorDescription::srgb());
    }

    #[test]
    fn test_parse_pair_with_overrides() {
        let d = parse_description(
            "display-p3:pq",
            LuminanceOverrides {
                reference: Some(250.0),
                min: Some(0.01),
                max: Some(1000.0),
            },
        )
        .unwrap();
        assert_eq!(d.colorimetry().name(), Some(NamedColorimetry::DisplayP3));
        assert_eq!(d.transfer_function().ty(), TransferFunctionType::PerceptualQuantizer);
        assert_eq!(d.reference_luminance(), 250.0);
        assert_eq!(d.min_luminance(), 0.01);
        assert_eq!(d.max_hdr_luminance(), Some(1000.0));
        assert_eq!(d.max_average_luminance(), Some(1000.0));
    }

    #[test]
    fn test_reference_override_scales_relative_curve() {
        let d = parse_description(
            "srgb",
            LuminanceOverrides {
                reference: Some(200.0),
                ..LuminanceOverrides::default()
            },
        )
        .unwrap();
        assert_eq!(d.reference_luminance(), 200.0);
        assert_eq!(d.transfer_function().max_luminance(), 200.0);
        assert_eq!(d.max_hdr_luminance(), Some(200.0));
        // encoded white lands on the new reference
        assert_eq!(d.transfer_function().encoded_to_nits(1.0), d.reference_luminance());

        // an explicit peak still wins
        let d = parse_description(
            "bt709:gamma22",
            LuminanceOverrides {
                reference: Some(200.0),
                max: Some(400.0),
                ..LuminanceOverrides::default()
            },
        )
        .unwrap();
        assert_eq!(d.transfer_function().max_luminance(), 200.0);
        assert_eq!(d.max_hdr_luminance(), Some(400.0));

        // absolute curves keep their range
        let d = parse_description(
            "hdr10",
            LuminanceOverrides {
                reference: Some(100.0),
                ..LuminanceOverrides::default()
            },
        )
        .unwrap();
        assert_eq!(d.transfer_function(), ColorDescription::bt2100_pq().transfer_function());
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_description("bt709", LuminanceOverrides::default()).is_err());
        assert!(parse_description("bt709:gamma9", LuminanceOverrides::default()).is_err());
        assert!(parse_description("nope:pq", LuminanceOverrides::default()).is_err());
    }
}
