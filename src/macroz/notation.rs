//! Printable key notation for raw captures.
//!
//! Produces the human-readable `content` of a record when the caller has no
//! rendering of its own: `ihello\x1b` becomes `ihello<Esc>`. The mapping is
//! one-way; exact replay always goes through the encoded `raw` field.

use std::fmt::Write;

pub fn render(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        for c in chunk.valid().chars() {
            push_key(&mut out, c);
        }
        for b in chunk.invalid() {
            let _ = write!(out, "<x{:02X}>", b);
        }
    }
    out
}

fn push_key(out: &mut String, c: char) {
    let named = match c {
        '\0' => "<Nul>",
        '\x08' => "<BS>",
        '\t' => "<Tab>",
        '\n' => "<NL>",
        '\r' => "<CR>",
        '\x1b' => "<Esc>",
        '\x7f' => "<Del>",
        '<' => "<lt>",
        c if (c as u32) < 0x20 => {
            // ^A..^_ map onto A.._ in the ASCII table.
            let key = ((c as u8) + 0x40) as char;
            let _ = write!(out, "<C-{}>", key.to_ascii_lowercase());
            return;
        }
        c => {
            out.push(c);
            return;
        }
    };
    out.push_str(named);
}
