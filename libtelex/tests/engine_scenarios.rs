//! Integration tests for the Vietnamese typing engine.
//!
//! Each test drives the engine one keystroke at a time the way a host
//! would, maintaining a simulated document from the results, and checks the
//! visible text.

use libtelex::{CodeTable, InputMethod, ProcessResult, TelexConfig, VietEngine};

/// Feed a line of keystrokes and fold the results into the text a host
/// document would show.
fn type_text(engine: &mut VietEngine, input: &str) -> String {
    let table = engine.config().base.code_table;
    let mut units: Vec<String> = Vec::new();
    for ch in input.chars() {
        let is_break = libtelex::keymap::is_word_break_char(ch);
        let result = engine.process_char(ch);
        if result.consumed {
            apply(&mut units, &result, table);
        }
        if is_break || !result.consumed {
            units.push(ch.to_string());
        }
    }
    units.concat()
}

fn apply(units: &mut Vec<String>, result: &ProcessResult, table: CodeTable) {
    for _ in 0..result.backspace_count {
        units.pop();
    }
    for ch in &result.chars {
        units.push(ch.render(table));
    }
}

fn telex() -> VietEngine {
    VietEngine::new(TelexConfig::default())
}

fn vni() -> VietEngine {
    let mut config = TelexConfig::default();
    config.base.input_method = InputMethod::Vni;
    VietEngine::new(config)
}

#[test]
fn telex_shape_keys() {
    assert_eq!(type_text(&mut telex(), "aa"), "â");
    assert_eq!(type_text(&mut telex(), "aw"), "ă");
    assert_eq!(type_text(&mut telex(), "ee"), "ê");
    assert_eq!(type_text(&mut telex(), "oo"), "ô");
    assert_eq!(type_text(&mut telex(), "ow"), "ơ");
    assert_eq!(type_text(&mut telex(), "uw"), "ư");
    assert_eq!(type_text(&mut telex(), "dd"), "đ");
    assert_eq!(type_text(&mut telex(), "w"), "ư");
}

#[test]
fn telex_shape_escapes() {
    assert_eq!(type_text(&mut telex(), "aaa"), "aa");
    assert_eq!(type_text(&mut telex(), "aww"), "aw");
    assert_eq!(type_text(&mut telex(), "ddd"), "dd");
    assert_eq!(type_text(&mut telex(), "ww"), "w");
}

#[test]
fn telex_tones() {
    assert_eq!(type_text(&mut telex(), "as"), "á");
    assert_eq!(type_text(&mut telex(), "af"), "à");
    assert_eq!(type_text(&mut telex(), "ar"), "ả");
    assert_eq!(type_text(&mut telex(), "ax"), "ã");
    assert_eq!(type_text(&mut telex(), "aj"), "ạ");
    assert_eq!(type_text(&mut telex(), "uws"), "ứ");
}

#[test]
fn telex_tone_replacement_and_escape() {
    // A different tone key replaces the mark.
    assert_eq!(type_text(&mut telex(), "asf"), "à");
    // The same tone key escapes back to the literal letter.
    assert_eq!(type_text(&mut telex(), "ass"), "as");
    // z clears the mark.
    assert_eq!(type_text(&mut telex(), "asz"), "a");
    // z with nothing to clear stays a letter.
    assert_eq!(type_text(&mut telex(), "za"), "za");
}

#[test]
fn telex_words() {
    assert_eq!(type_text(&mut telex(), "vieejt"), "việt");
    assert_eq!(type_text(&mut telex(), "nam"), "nam");
    assert_eq!(type_text(&mut telex(), "chaof"), "chào");
    assert_eq!(type_text(&mut telex(), "nuwowcs"), "nước");
    assert_eq!(type_text(&mut telex(), "ddaats"), "đất");
}

#[test]
fn late_binding_tone_after_next_letter() {
    // f binds to the ư typed two keystrokes earlier.
    let mut engine = telex();
    assert_eq!(type_text(&mut engine, "thuwef"), "thừe");

    // The log keeps the true typing order; the structural order groups the
    // f with its entry.
    let log: Vec<char> = engine
        .buffer()
        .get_keystroke_sequence()
        .iter()
        .filter_map(|k| libviet_core::keys::char_for_key(k.key_code, k.caps))
        .collect();
    assert_eq!(log, vec!['t', 'h', 'u', 'w', 'e', 'f']);

    let structural: Vec<char> = engine
        .buffer()
        .get_all_raw_keystrokes()
        .iter()
        .filter_map(|k| libviet_core::keys::char_for_key(k.key_code, k.caps))
        .collect();
    assert_eq!(structural, vec!['t', 'h', 'u', 'w', 'f', 'e']);
}

#[test]
fn tone_placement_styles() {
    // Traditional: hòa. Modern: hoà.
    let mut traditional = telex();
    assert_eq!(type_text(&mut traditional, "hoaf"), "hòa");

    let mut modern = telex();
    modern.config_mut().base.modern_style = true;
    assert_eq!(type_text(&mut modern, "hoaf"), "hoà");

    // A coda forces the second vowel in both styles.
    let mut traditional = telex();
    assert_eq!(type_text(&mut traditional, "hoans"), "hoán");
    let mut modern = telex();
    modern.config_mut().base.modern_style = true;
    assert_eq!(type_text(&mut modern, "hoans"), "hoán");
}

#[test]
fn glides_never_take_the_tone() {
    assert_eq!(type_text(&mut telex(), "quys"), "quý");
    assert_eq!(type_text(&mut telex(), "gias"), "giá");
}

#[test]
fn uppercase_words() {
    assert_eq!(type_text(&mut telex(), "Vieejt"), "Việt");
    assert_eq!(type_text(&mut telex(), "DDoong"), "Đông");
}

#[test]
fn vni_shapes_and_tones() {
    assert_eq!(type_text(&mut vni(), "a6"), "â");
    assert_eq!(type_text(&mut vni(), "a8"), "ă");
    assert_eq!(type_text(&mut vni(), "o7"), "ơ");
    assert_eq!(type_text(&mut vni(), "u7"), "ư");
    assert_eq!(type_text(&mut vni(), "d9"), "đ");
    assert_eq!(type_text(&mut vni(), "a1"), "á");
    assert_eq!(type_text(&mut vni(), "a5"), "ạ");
    assert_eq!(type_text(&mut vni(), "tuyen64"), "tuyễn");
    assert_eq!(type_text(&mut vni(), "nuoc71"), "nước");
}

#[test]
fn vni_digits_stay_literal_without_target() {
    assert_eq!(type_text(&mut vni(), "b6"), "b6");
    assert_eq!(type_text(&mut vni(), "1"), "1");
    // Telex tone letters mean nothing in VNI.
    assert_eq!(type_text(&mut vni(), "as"), "as");
}

#[test]
fn simple_telex_variants() {
    let mut st1 = telex();
    st1.config_mut().base.input_method = InputMethod::SimpleTelex1;
    assert_eq!(type_text(&mut st1, "w"), "w");
    assert_eq!(type_text(&mut st1, "aa"), "â");

    let mut st2 = telex();
    st2.config_mut().base.input_method = InputMethod::SimpleTelex2;
    assert_eq!(type_text(&mut st2, "w"), "ư");
}

#[test]
fn bracket_shortcuts_full_telex_only() {
    assert_eq!(type_text(&mut telex(), "["), "ơ");
    assert_eq!(type_text(&mut telex(), "]"), "ư");

    let mut st2 = telex();
    st2.config_mut().base.input_method = InputMethod::SimpleTelex2;
    assert_eq!(type_text(&mut st2, "["), "[");
}

#[test]
fn backspace_drops_one_grapheme() {
    let mut engine = telex();
    type_text(&mut engine, "thuw");
    let result = engine.process_backspace();
    assert!(!result.consumed); // Unicode table: host deletes the unit
    assert_eq!(result.backspace_count, 1);
    assert_eq!(engine.composed_text(), "th");
    // The removed entry takes its whole keystroke span with it.
    assert_eq!(engine.buffer().keystroke_sequence_count(), 2);
}

#[test]
fn backspace_consumes_for_multi_scalar_tables() {
    let mut engine = telex();
    engine.config_mut().base.code_table = CodeTable::UnicodeCompound;
    type_text(&mut engine, "ow");
    let result = engine.process_backspace();
    assert!(result.consumed);
    assert_eq!(result.backspace_count, 1);
}

#[test]
fn escape_restores_chronological_raw() {
    let mut engine = telex();
    type_text(&mut engine, "thuwef");
    let result = engine.process_escape();
    assert!(result.consumed);
    // Four rendered units (t, h, ừ, e) come out...
    assert_eq!(result.backspace_count, 4);
    // ...and the six physical keystrokes go back in, in typing order.
    assert_eq!(result.render(&engine.config().base), "thuwef");
    assert!(engine.buffer().is_empty());
}

#[test]
fn word_break_snapshots_and_undo_restores_raw() {
    let mut engine = telex();
    type_text(&mut engine, "thuwef");
    engine.process_word_break('\n');
    assert!(engine.buffer().is_empty());
    assert_eq!(engine.history().count(), 1);

    let result = engine.undo_last_word().expect("history has a word");
    assert_eq!(result.backspace_count, 4);
    assert_eq!(result.render(&engine.config().base), "thuwef");
    assert!(engine.undo_last_word().is_none());
}

#[test]
fn space_runs_are_their_own_history_unit() {
    let mut engine = telex();
    type_text(&mut engine, "chaof   x");
    // The word and the three spaces each form one history entry.
    assert_eq!(engine.history().count(), 2);
    let spaces = engine.history().last().unwrap();
    assert_eq!(spaces.count(), 3);
    assert!(spaces.first_key_code() == Some(libviet_core::keys::KEY_SPACE));
}

#[test]
fn restore_wrong_spelling_rewrites_foreign_words() {
    let mut engine = telex();
    engine.config_mut().base.restore_if_wrong_spelling = true;

    let text = type_text(&mut engine, "state ");
    assert_eq!(text, "state ");

    // A Vietnamese word is left composed.
    let mut engine = telex();
    engine.config_mut().base.restore_if_wrong_spelling = true;
    let text = type_text(&mut engine, "chaof ");
    assert_eq!(text, "chào ");
}

#[test]
fn restore_wrong_spelling_undoes_transforms() {
    let mut engine = telex();
    engine.config_mut().base.restore_if_wrong_spelling = true;

    // "was" composes to "ứa" mid-word, then reverts at the boundary.
    let text = type_text(&mut engine, "was ");
    assert_eq!(text, "was ");
}

#[test]
fn quick_telex_consonant_doubling() {
    let mut engine = telex();
    engine.config_mut().quick_telex = true;
    assert_eq!(type_text(&mut engine, "cc"), "ch");

    let mut engine = telex();
    engine.config_mut().quick_telex = true;
    assert_eq!(type_text(&mut engine, "ttuwf"), "thừ");

    // Off by default.
    assert_eq!(type_text(&mut telex(), "cc"), "cc");
}

#[test]
fn quick_start_and_end_consonants() {
    let mut engine = telex();
    engine.config_mut().quick_start_consonant = true;
    assert_eq!(type_text(&mut engine, "fuj"), "phụ");

    let mut engine = telex();
    engine.config_mut().quick_end_consonant = true;
    assert_eq!(type_text(&mut engine, "hoag"), "hoang");

    let mut engine = telex();
    engine.config_mut().quick_end_consonant = true;
    assert_eq!(type_text(&mut engine, "nhanh"), "nhanh");
}

#[test]
fn uppercase_first_char_fix() {
    let mut engine = telex();
    engine.config_mut().base.upper_case_first_char = true;

    let text = type_text(&mut engine, "viet");
    assert_eq!(text, "Viet");

    // Mid-sentence words stay as typed.
    let text = type_text(&mut engine, " nam");
    assert_eq!(text, " nam");

    // A sentence end re-arms the fix.
    let text = type_text(&mut engine, ". toi");
    assert_eq!(text, ". Toi");
}

#[test]
fn code_tables_render_the_same_composition() {
    for (table, expected) in [
        (CodeTable::Unicode, "ớ".to_string()),
        (CodeTable::UnicodeCompound, format!("o\u{31B}\u{301}")),
        (CodeTable::VietnameseLocaleCp1258, format!("ơ\u{301}")),
        (CodeTable::Tcvn3, "ớ".to_string()),
        (CodeTable::VniWindows, "ớ".to_string()),
    ] {
        let mut engine = telex();
        engine.config_mut().base.code_table = table;
        assert_eq!(type_text(&mut engine, "ows"), expected, "table {:?}", table);
    }
}

#[test]
fn compound_rendering_matches_nfd() {
    use unicode_normalization::UnicodeNormalization;
    let mut engine = telex();
    engine.config_mut().base.code_table = CodeTable::UnicodeCompound;
    let text = type_text(&mut engine, "nuwowcs");
    let recomposed: String = text.nfc().collect();
    assert_eq!(recomposed, "nước");
}
