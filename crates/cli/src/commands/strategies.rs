use anyhow::Result;
use mazeprobe_kernel::registry;

pub fn execute() -> Result<()> {
    let registry = registry();
    let width = registry.names().iter().map(String::len).max().unwrap_or(0);
    for (name, strategy) in registry.iter() {
        println!("{name:<width$}  {}", strategy.description());
    }
    Ok(())
}
