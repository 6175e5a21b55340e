use clap::Parser;
use std::io::{self, BufRead};

use libtelex::{CodeTable, InputMethod, ProcessResult, TelexConfig, VietEngine};

#[derive(Parser, Debug)]
#[command(name = "libtelex", about = "Interactive Vietnamese typing test")]
struct Args {
    /// Input convention: telex, vni, simple-telex1, simple-telex2
    #[arg(long, default_value = "telex")]
    method: String,

    /// Output code table: unicode, tcvn3, vni-windows, compound, cp1258
    #[arg(long, default_value = "unicode")]
    table: String,

    /// Place tones in modern style (hoà instead of hòa)
    #[arg(long)]
    modern: bool,

    /// Restore words that do not look Vietnamese to their raw keystrokes
    #[arg(long)]
    restore_wrong_spelling: bool,
}

fn parse_method(name: &str) -> InputMethod {
    match name {
        "vni" => InputMethod::Vni,
        "simple-telex1" => InputMethod::SimpleTelex1,
        "simple-telex2" => InputMethod::SimpleTelex2,
        _ => InputMethod::Telex,
    }
}

fn parse_table(name: &str) -> CodeTable {
    match name {
        "tcvn3" => CodeTable::Tcvn3,
        "vni-windows" => CodeTable::VniWindows,
        "compound" => CodeTable::UnicodeCompound,
        "cp1258" => CodeTable::VietnameseLocaleCp1258,
        _ => CodeTable::Unicode,
    }
}

/// A simulated text field: inserted output units, newest last. The engine's
/// backspace counts are in units, which matters for the multi-scalar tables.
struct Document {
    units: Vec<String>,
}

impl Document {
    fn new() -> Self {
        Self { units: Vec::new() }
    }

    /// Apply an engine result the way a host text field would: delete the
    /// requested units, insert the rendered graphemes.
    fn apply(&mut self, result: &ProcessResult, table: CodeTable) {
        for _ in 0..result.backspace_count {
            self.units.pop();
        }
        for ch in &result.chars {
            self.units.push(ch.render(table));
        }
    }

    fn insert(&mut self, ch: char) {
        self.units.push(ch.to_string());
    }

    fn text(&self) -> String {
        self.units.concat()
    }
}

fn main() {
    let args = Args::parse();

    let mut config = TelexConfig::default();
    config.base.input_method = parse_method(&args.method);
    config.base.code_table = parse_table(&args.table);
    config.base.modern_style = args.modern;
    config.base.restore_if_wrong_spelling = args.restore_wrong_spelling;

    println!("═══════════════════════════════════════════════════");
    println!("  libtelex - Interactive Vietnamese Typing Test");
    println!("═══════════════════════════════════════════════════");
    println!();
    println!(
        "Method: {} | Table: {}",
        config.base.input_method.display_name(),
        config.base.code_table.display_name()
    );
    println!("Type a line of keystrokes and press Enter.");
    println!("Examples: xin chaof, thuwe, nuwowcs, hoa binhf");
    println!("Press Ctrl+C to exit.");
    println!();

    let mut engine = VietEngine::new(config);

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let raw = match line {
            Ok(raw) => raw,
            Err(_) => break,
        };

        let table = engine.config().base.code_table;
        let mut doc = Document::new();
        for ch in raw.chars() {
            let is_break = libtelex::keymap::is_word_break_char(ch);
            let result = engine.process_char(ch);
            if result.consumed {
                doc.apply(&result, table);
            }
            // Break characters and unconsumed keys land in the document
            // as the host typed them.
            if is_break || !result.consumed {
                doc.insert(ch);
            }
        }
        // A newline ends the last word of the line.
        let result = engine.process_word_break('\n');
        if result.consumed {
            doc.apply(&result, table);
        }

        println!("  {} → {}", raw, doc.text());
        engine.reset();
    }
}
