fn main() -> anyhow::Result<()> {
    mcsum::run()
}
