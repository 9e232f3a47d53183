fn main() -> anyhow::Result<()> {
    netmon_cli::run()
}
