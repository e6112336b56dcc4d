use std::net::Ipv4Addr;
use std::time::Duration;

use crate::terminal::colors;
use colored::*;
use tracing::info;
use unicode_width::UnicodeWidthStr;

/// Events on this target are rendered verbatim, without a level symbol.
pub const PRINT_TARGET: &str = "srvsearch::print";

pub const TOTAL_WIDTH: usize = 64;

#[macro_export]
macro_rules! mprint {
    () => {
        $crate::terminal::print::print("");
    };
    ($msg:expr) => {
        $crate::terminal::print::print($msg);
    };
}

pub fn print(msg: &str) {
    info!(target: PRINT_TARGET, raw_msg = msg);
}

pub fn header(msg: &str) {
    let formatted: String = format!("⟦ {} ⟧", msg);
    let msg_len: usize = UnicodeWidthStr::width(formatted.as_str());

    let dash_count: usize = TOTAL_WIDTH.saturating_sub(msg_len);
    let left: usize = dash_count / 2;
    let right: usize = dash_count - left;

    let line: ColoredString = format!(
        "{}{}{}",
        "─".repeat(left),
        formatted.to_uppercase().color(colors::PRIMARY),
        "─".repeat(right)
    )
    .color(colors::SEPARATOR);

    print(&format!("{}", line));
}

pub fn fat_separator() {
    let sep: ColoredString = "═".repeat(TOTAL_WIDTH).color(colors::SEPARATOR);
    print(&format!("{}", sep));
}

/// Centers `msg`, which may already carry color codes.
pub fn centerln(msg: &str) {
    let space = " ".repeat(TOTAL_WIDTH.saturating_sub(console::measure_text_width(msg)) / 2);
    print(&format!("{}{}", space, msg));
}

pub fn summary_line(total: usize, reachable: usize, responded: usize, elapsed: Duration) -> String {
    format!(
        "{} polled, {} reachable, {} responded in {}",
        total.to_string().color(colors::ACCENT).bold(),
        reachable.to_string().color(colors::ACCENT).bold(),
        responded.to_string().color(colors::PRIMARY).bold(),
        format!("{:.2}s", elapsed.as_secs_f64()).yellow().bold(),
    )
}

pub fn server_line(addr: Ipv4Addr, server: &str) -> String {
    format!(
        "{}{}{} {}",
        "http://".color(colors::SEPARATOR),
        addr.to_string().color(colors::IPV4_ADDR),
        ":".color(colors::SEPARATOR),
        server.color(colors::SERVER)
    )
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
