//! Welcome banner (STUDY-ME) with a vertical gradient.

use crossterm::queue;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use figlet_rs::FIGfont;
use std::io::{self, Write, stdout};

/// Sakura pink (#ff7eb6).
const SAKURA: (u8, u8, u8) = (0xff, 0x7e, 0xb6);
/// Sky blue (#5ec8ff).
const SKY: (u8, u8, u8) = (0x5e, 0xc8, 0xff);

/// Color `t` of the way from `a` to `b`. `t` in [0.0, 1.0].
fn gradient(a: (u8, u8, u8), b: (u8, u8, u8), t: f64) -> Color {
    let mix = |x: u8, y: u8| (f64::from(x) + (f64::from(y) - f64::from(x)) * t).round() as u8;
    Color::Rgb {
        r: mix(a.0, b.0),
        g: mix(a.1, b.1),
        b: mix(a.2, b.2),
    }
}

fn banner_art() -> String {
    FIGfont::standard()
        .ok()
        .and_then(|font| font.convert("STUDY-ME").map(|f| f.to_string()))
        .unwrap_or_else(|| "STUDY-ME".to_string())
}

/// Queues the colored banner and version line on `out`, then flushes.
fn write_banner(out: &mut impl Write, art: &str) -> io::Result<()> {
    let lines: Vec<&str> = art.lines().filter(|l| !l.trim().is_empty()).collect();
    let steps = lines.len().saturating_sub(1).max(1) as f64;
    for (i, line) in lines.iter().enumerate() {
        queue!(
            out,
            SetForegroundColor(gradient(SAKURA, SKY, i as f64 / steps)),
            Print(line),
            Print("\r\n")
        )?;
    }
    queue!(
        out,
        SetForegroundColor(gradient(SAKURA, SKY, 1.0)),
        Print(format!("v{} ・ 学習記録ボット\r\n", env!("CARGO_PKG_VERSION"))),
        ResetColor
    )?;
    out.flush()
}

/// Prints "STUDY-ME" in the standard figlet font, pink to blue, then the version.
pub fn print_welcome() {
    if let Err(e) = write_banner(&mut stdout(), &banner_art()) {
        tracing::debug!(error = %e, "banner not printed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gradient_endpoints() {
        assert_eq!(gradient(SAKURA, SKY, 0.0), Color::Rgb { r: 0xff, g: 0x7e, b: 0xb6 });
        assert_eq!(gradient(SAKURA, SKY, 1.0), Color::Rgb { r: 0x5e, g: 0xc8, b: 0xff });
    }

    #[test]
    fn banner_contains_art_and_version() {
        let mut buf = Vec::new();
        write_banner(&mut buf, "AB\nCD\n").unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("AB\r\n"));
        assert!(text.contains("CD\r\n"));
        assert!(text.contains(env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn art_is_multiline() {
        assert!(banner_art().lines().count() > 1);
    }
}
