use colored::Colorize;
use macroz::api::{CmdMessage, MessageLevel};
use macroz::config::MacroConfig;
use macroz::index::DisplayMacro;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const LINE_WIDTH: usize = 100;
const NAME_WIDTH: usize = 20;

/// Info and success go to stdout; warnings and errors to stderr so that
/// `show --raw` output stays clean.
pub fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => eprintln!("{}", message.content.yellow()),
            MessageLevel::Error => eprintln!("{}", message.content.red()),
        }
    }
}

pub fn print_macros(macros: &[DisplayMacro]) {
    if macros.is_empty() {
        println!("No macros found.");
        return;
    }

    let idx_width = macros
        .iter()
        .map(|dm| format!("{}. ", dm.index).width())
        .max()
        .unwrap_or(0);

    for dm in macros {
        let idx_str = format!("{:<width$}", format!("{}. ", dm.index), width = idx_width);
        let name = truncate_to_width(&dm.record.name, NAME_WIDTH);
        let padding = NAME_WIDTH.saturating_sub(name.width());

        let available = LINE_WIDTH.saturating_sub(idx_width + NAME_WIDTH + 2);
        let content = truncate_to_width(&single_line(&dm.record.content), available);

        println!(
            "{}{}{}  {}",
            idx_str.yellow(),
            name.bold(),
            " ".repeat(padding),
            content.dimmed()
        );
    }
}

pub fn print_full_macro(dm: &DisplayMacro, raw: &[u8]) {
    println!("{} {}", dm.index.to_string().yellow(), dm.record.name.bold());
    println!("--------------------------------");
    println!("{}   {}", "content".dimmed(), dm.record.content);
    println!("{}       {}", "raw".dimmed(), dm.record.raw);
    println!("{}     {}", "bytes".dimmed(), hex_preview(raw));
}

pub fn print_config(config: &MacroConfig) {
    for key in macroz::config::KEYS {
        if let Some(value) = config.get(key) {
            println!("{} = {}", key, value);
        }
    }
}

fn single_line(s: &str) -> String {
    s.chars().map(|c| if c == '\n' { ' ' } else { c }).collect()
}

fn hex_preview(bytes: &[u8]) -> String {
    const MAX: usize = 32;
    let mut out: Vec<String> = bytes.iter().take(MAX).map(|b| format!("{:02x}", b)).collect();
    if bytes.len() > MAX {
        out.push(format!("… ({} bytes)", bytes.len()));
    }
    out.join(" ")
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let mut result = String::new();
    let mut current_width = 0;
    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }
    result
}
