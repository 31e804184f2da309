//! End-to-end builds from table files to written artifacts.

use std::fs;
use std::path::{Path, PathBuf};

use pinmux_core::{CompileError, CompileOptions};
use pinmux_emit::{build_table, EmitError, OutputLayout};

const BOARD: &str = "MK20D5,Pin,ALT0,ALT1,ALT2,ALT3\n\
                     Pin,PTD5,ADC0_SE6b,PTD5,SPI0_PCS2,FTM0_CH5\n\
                     Pin,PTC2,ADC0_SE4b,PTC2,SPI0_PCS2,FTM0_CH1\n\
                     Pin,PTA3,,PTA3,,FTM0_CH0\n\
                     Pin,PTA4,,PTA4,,FTM0_CH1\n\
                     Pin,PTB2,ADC0_SE12,PTB2,I2C0_SCL\n\
                     Alias,D10,PTC2\n\
                     Alias,A3,PTC2\n\
                     Default,SPI0_PCS2,PTD5\n\
                     Default,FTM0_CH1,PTC2\n\
                     ClockInfo,ADC0,SIM->SCGC6\n\
                     ClockInfo,PORTA,SIM->SCGC5,SIM_SCGC5_PORTA_MASK\n\
                     ClockInfo,PORTB,SIM->SCGC5\n";

fn write_table(dir: &Path, name: &str, text: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, text).unwrap();
    path
}

fn build(table: &Path) -> Result<Vec<String>, EmitError> {
    let set = build_table(table, &CompileOptions::default(), &OutputLayout::default(), None)?;
    let written = set.write()?;
    Ok(written
        .iter()
        .map(|p| fs::read_to_string(p).unwrap())
        .collect())
}

#[test]
fn single_row_table_collapses_everything() {
    let dir = tempfile::tempdir().unwrap();
    let table = write_table(dir.path(), "MK20D5.csv", "MK20D5\nPin,PTA3,ADC0_SE3,FTM0_CH1\n");
    let outputs = build(&table).unwrap();
    let header = &outputs[0];

    assert!(!header.contains("_SEL"));
    assert!(header.contains("#define PTA3_ADC_CH                3"));
    assert!(header.contains("#define PTA3_FTM_CH                1"));
    assert!(dir.path().join("Project_Headers/pin_mapping-MK20D5.h").is_file());
    assert!(dir.path().join("Project_Headers/gpio-MK20D5.h").is_file());
    assert!(dir.path().join("Sources/gpio-MK20D5.cpp").is_file());
}

#[test]
fn rebuilding_is_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let table = write_table(dir.path(), "MK20D5.csv", BOARD);
    let first = build(&table).unwrap();
    let second = build(&table).unwrap();
    assert_eq!(first, second);
}

#[test]
fn alias_fan_in_appears_everywhere() {
    let dir = tempfile::tempdir().unwrap();
    let table = write_table(dir.path(), "MK20D5.csv", BOARD);
    let outputs = build(&table).unwrap();

    assert!(outputs[0].contains("// PTC2 = ADC0_SE4,GPIOC_2,SPI0_PCS2,FTM0_CH1 (Alias: A3,D10)\n"));
    assert!(outputs[0].contains("//     <1=> PTC2 (Alias: A3,D10)\n"));
    assert!(outputs[1].contains("#define digitalIO_A3"));
    assert!(outputs[1].contains("#define digitalIO_D10"));
    assert!(outputs[1].contains("//!< alias D10=>PTC2\n"));
}

#[test]
fn default_rows_set_selection_values() {
    let dir = tempfile::tempdir().unwrap();
    let table = write_table(dir.path(), "MK20D5.csv", BOARD);
    let header = build(&table).unwrap().remove(0);

    // PTC2 sorts before PTD5, so PTD5 is candidate 2.
    assert!(header.contains("#define SPI0_PCS2_SEL        2 "));
    assert!(header.contains("#define FTM0_CH1_SEL         2 "));
    assert!(header.contains("//   <o> FTM0_CH1 Pin Selection [PTA4, PTC2(A3,D10)] \n"));
    assert!(header.contains("#if FTM0_CH1_SEL == 1\n#define PTA4_FTM_NUM"));
    assert!(header.contains("#if FTM0_CH1_SEL == 2\n#define PTC2_FTM_NUM"));
}

#[test]
fn gpio_artifacts_share_guards() {
    let dir = tempfile::tempdir().unwrap();
    let table = write_table(dir.path(), "MK20D5.csv", BOARD);
    let outputs = build(&table).unwrap();

    assert!(outputs[1].contains("#if FTM0_CH1_SEL == 2\nextern const PwmIO  pwmIO_PTC2;"));
    assert!(outputs[2].contains("#if FTM0_CH1_SEL == 2\nconst PwmIO  pwmIO_PTC2 "));
    assert!(outputs[2].contains("#if FTM0_CH1_SEL == 1\nconst PwmIO  pwmIO_PTA4 "));
}

#[test]
fn candidate_order_ignores_row_order() {
    let dir = tempfile::tempdir().unwrap();
    let mut lines: Vec<&str> = BOARD.lines().collect();
    let title = lines.remove(0);
    lines.reverse();
    let reversed = format!("{title}\n{}\n", lines.join("\n"));

    let forward = build(&write_table(dir.path(), "MK20D5.csv", BOARD)).unwrap();
    let backward = build(&write_table(dir.path(), "MK20D5.csv", &reversed)).unwrap();
    assert_eq!(forward, backward);
}

#[test]
fn inconsistent_port_clocks_fail_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let text = "MK20D5\n\
                Pin,PTA1,,PTA1\n\
                ClockInfo,PORTA,SIM->SCGC5\n\
                ClockInfo,PORTB,SIM->SCGC6\n";
    let table = write_table(dir.path(), "MK20D5.csv", text);
    let err = build(&table).unwrap_err();
    assert!(matches!(
        err,
        EmitError::Compile(CompileError::InconsistentPortClock { .. })
    ));
    assert!(!dir.path().join("Project_Headers").exists());
}

#[test]
fn consistent_port_clocks_drive_default() {
    let dir = tempfile::tempdir().unwrap();
    let table = write_table(dir.path(), "MK20D5.csv", BOARD);
    let header = build(&table).unwrap().remove(0);
    assert!(header.contains("#define PORT_CLOCK_REG       SIM->SCGC5"));
    assert!(header.contains("#define PORTB_CLOCK_MASK     SIM_SCGC5_PORTB_MASK"));
    assert!(header.contains("#define DEFAULT_PORT_CLOCK_REG  SIM->SCGC5 "));
}

#[test]
fn unknown_default_reports_known_functions() {
    let dir = tempfile::tempdir().unwrap();
    let text = "MK20D5\nPin,PTA1,,PTA1,,FTM0_CH1\nDefault,FTM0_CH9,PTA1\n";
    let table = write_table(dir.path(), "MK20D5.csv", text);
    let message = build(&table).unwrap_err().to_string();
    assert!(message.contains("FTM0_CH9"));
    assert!(message.contains("known functions: FTM0_CH1, GPIOA_1"));
}

#[test]
fn out_dir_overrides_table_directory() {
    let tables = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let table = write_table(tables.path(), "MKL25Z4.csv", "MKL25Z4\nPin,PTE20,ADC0_DP0,PTE20,,TPM1_CH0\n");
    let set = build_table(
        &table,
        &CompileOptions::default(),
        &OutputLayout::default(),
        Some(out.path()),
    )
    .unwrap();
    set.write().unwrap();
    let header = fs::read_to_string(out.path().join("Project_Headers/pin_mapping-MKL25Z4.h")).unwrap();
    assert!(header.contains("// <h> Clock settings for TPM1"));
    assert!(!tables.path().join("Project_Headers").exists());
}

#[test]
fn repeated_function_on_one_pin_is_defined_once() {
    let dir = tempfile::tempdir().unwrap();
    let text = "MK20D5\nPin,PTD2,,PTD2,SPI0_SOUT,UART0_TX,SPI0_SOUT/UART0_TX\n";
    let table = write_table(dir.path(), "MK20D5.csv", text);
    let header = build(&table).unwrap().remove(0);

    for name in ["SPI0_SOUT_FN", "SPI0_SOUT_GPIO", "UART0_TX_FN", "UART0_TX_GPIO"] {
        let defines = header
            .lines()
            .filter(|line| line.starts_with(&format!("#define {name} ")))
            .count();
        assert_eq!(defines, 1, "{name}");
    }
    assert!(header.contains("#define SPI0_SOUT_FN               2"));
    assert!(header.contains("#define UART0_TX_FN                3"));
}

#[test]
fn timer_clocks_ignore_non_channel_signals() {
    let dir = tempfile::tempdir().unwrap();
    let text = "MK20D5\nPin,PTA1,,PTA1,,FTM0_FLT2\nPin,PTA2,,PTA2,,TPM1_CH0\n";
    let table = write_table(dir.path(), "MK20D5.csv", text);
    let outputs = build(&table).unwrap();

    assert!(!outputs[0].contains("Clock settings for FTM0"));
    assert!(outputs[0].contains("Clock settings for TPM1"));
    assert!(!outputs[2].contains("FTM_CLOCK_REG(number)"));
    assert!(outputs[2].contains("TPM_CLOCK_REG(number)"));
}
