use ocean_ngin::Config;

fn main() -> anyhow::Result<()> {
    ocean_ngin::run(Config::default())
}
