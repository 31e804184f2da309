//! `pinmux init`: project scaffolding.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::manifest::{PinmuxManifest, MANIFEST_FILE};

/// Create a new pinmux project at the given path.
///
/// `name` is the project name. The directory `name` is created relative to cwd.
pub fn run(name: &str) -> Result<()> {
    let project_dir = Path::new(name);
    create_project(project_dir, name)
}

pub(crate) fn create_project(project_dir: &Path, name: &str) -> Result<()> {
    if project_dir.exists() {
        bail!("directory '{}' already exists", project_dir.display());
    }

    fs::create_dir_all(project_dir)
        .with_context(|| format!("creating {}", project_dir.display()))?;

    fs::write(project_dir.join(MANIFEST_FILE), PinmuxManifest::template(name))
        .context("writing pinmux.toml")?;

    let table = format!("{name}.csv");
    fs::write(project_dir.join(&table), sample_table(name))
        .with_context(|| format!("writing {table}"))?;

    fs::write(project_dir.join(".gitignore"), "Project_Headers/\nSources/\n")
        .context("writing .gitignore")?;

    println!("Created project '{name}'");
    println!("  {name}/{MANIFEST_FILE}");
    println!("  {name}/{table}");
    println!("  {name}/.gitignore");

    Ok(())
}

/// A small table exercising each row keyword.
fn sample_table(name: &str) -> String {
    format!(
        "{name},Pin,ALT0,ALT1,ALT2,ALT3,ALT4\n\
         Pin,PTA1,,PTA1,,FTM0_CH6\n\
         Pin,PTB0,ADC0_SE8,PTB0,I2C0_SCL,FTM1_CH0\n\
         Pin,PTB1,ADC0_SE9,PTB1,I2C0_SDA,FTM1_CH1\n\
         Pin,PTC5,,PTC5,SPI0_SCK\n\
         Pin,PTD1,ADC0_SE5b,PTD1,SPI0_SCK\n\
         Pin,PTD2,,PTD2,SPI0_SOUT,,I2C0_SCL\n\
         Alias,D13,PTD1\n\
         Alias,A0,PTB0\n\
         Default,SPI0_SCK,PTD1\n\
         ClockInfo,ADC0,SIM->SCGC6\n\
         ClockInfo,PORTA,SIM->SCGC5\n\
         ClockInfo,PORTB,SIM->SCGC5\n\
         ClockInfo,PORTC,SIM->SCGC5\n\
         ClockInfo,PORTD,SIM->SCGC5\n"
    )
}
