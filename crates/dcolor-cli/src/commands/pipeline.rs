//! Pipeline listing command

use anyhow::Result;
use dcolor_pipeline::PipelineConfig;

use crate::ConversionArgs;

pub fn run(args: ConversionArgs, config: &PipelineConfig) -> Result<()> {
    let (from, to, pipeline) = super::build_pipeline(&args, config)?;

    println!("from:   {}", from);
    println!("to:     {}", to);
    println!("intent: {}", args.intent);
    println!("input:  {}", pipeline.input_range());
    println!("ops:    {}", pipeline.len());
    println!();
    println!("{}", pipeline);
    Ok(())
}
