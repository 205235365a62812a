fn main() -> anyhow::Result<()> {
    pkgdag_lib::main()
}
