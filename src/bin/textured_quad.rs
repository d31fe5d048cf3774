use anyhow::Context;

fn main() -> anyhow::Result<()> {
    learn_dx::logging::init("info");

    run().context("textured_quad failed")
}

#[cfg(windows)]
fn run() -> anyhow::Result<()> {
    learn_dx::samples::run::<learn_dx::samples::TexturedQuad>()?;
    Ok(())
}

#[cfg(not(windows))]
fn run() -> anyhow::Result<()> {
    Err(learn_dx::Error::UnsupportedPlatform.into())
}
