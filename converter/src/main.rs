fn main() -> anyhow::Result<()> {
    converter::run()
}
