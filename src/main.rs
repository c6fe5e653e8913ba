fn main() -> anyhow::Result<()> {
    spk_generator::run()
}
