use anyhow::Result;

fn main() -> Result<()> {
    let status = execbox::cli::run()?;
    std::process::exit(status)
}
