//! Shader uniform serialization command

use anyhow::{Context, Result};
use dcolor_pipeline::PipelineConfig;
use dcolor_shader::ShaderUniforms;

use crate::ConversionArgs;

pub fn run(args: ConversionArgs, config: &PipelineConfig) -> Result<()> {
    let (_, _, pipeline) = super::build_pipeline(&args, config)?;
    let uniforms = ShaderUniforms::from_pipeline(&pipeline)
        .context("Pipeline does not fit the shader")?;

    println!("{}", uniforms.usage());
    println!("uniform block: {} bytes", uniforms.as_bytes().len());
    for (i, op) in uniforms.active_ops().iter().enumerate() {
        println!("{:2}: kind {} slot {}", i, op.kind, op.index);
    }
    Ok(())
}
