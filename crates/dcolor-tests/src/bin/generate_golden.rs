//! Writes `golden/pipelines.json` from the current implementation.

use dcolor_tests::golden;

const CUBE_SIZE: usize = 9;

fn main() -> std::io::Result<()> {
    let data = golden::compute_golden(CUBE_SIZE);
    let path = golden::golden_path();
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    std::fs::write(&path, serde_json::to_string_pretty(&data)?)?;
    for entry in &data.entries {
        println!("{:32} {:2} ops  {}", entry.name, entry.ops, entry.hash);
    }
    println!("wrote {}", path.display());
    Ok(())
}
