//! Single value conversion command

use anyhow::Result;
use dcolor_math::Vec3;
use dcolor_pipeline::PipelineConfig;

use crate::MapArgs;

pub fn run(args: MapArgs, config: &PipelineConfig) -> Result<()> {
    let (_, _, pipeline) = super::build_pipeline(&args.conversion, config)?;
    let out = pipeline.evaluate(Vec3::new(args.r, args.g, args.b));
    println!("{:.6} {:.6} {:.6}", out.x, out.y, out.z);
    Ok(())
}
