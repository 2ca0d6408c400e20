//! WGSL source command

use anyhow::Result;

pub fn run() -> Result<()> {
    print!("{}", dcolor_shader::COLOR_PIPELINE_WGSL);
    Ok(())
}
