//! Vietnamese word-shape classification.
//!
//! A coarse check over the raw letters of a buffered word, used to decide
//! whether the user was actually typing English (or another language) so
//! the engine can hand the raw keystrokes back. This is classification
//! only, not a dictionary: it rejects letter sequences no Vietnamese
//! syllable can contain and accepts everything else.

/// Two-letter onset clusters that never open a Vietnamese syllable.
static FOREIGN_ONSETS: phf::Set<&'static str> = phf::phf_set! {
    "bl", "br", "cl", "cr", "dr", "fl", "fr", "gl", "gr", "kl", "kr",
    "pl", "pr", "sl", "sk", "sp", "st", "sw", "tw",
    "pb", "pc", "pd", "pf", "pg", "pk", "pq", "ps", "pt",
};

/// Letters that do not occur in Vietnamese spelling at all.
fn is_foreign_letter(ch: char) -> bool {
    matches!(ch, 'f' | 'j' | 'w' | 'z')
}

/// True when the raw letter sequence cannot be a Vietnamese syllable.
///
/// `allow_fjwz` keeps f/j/w/z from counting as evidence, for setups that
/// type foreign names with the engine left on.
pub fn is_foreign_word(raw: &str, allow_fjwz: bool) -> bool {
    let letters: Vec<char> = raw.chars().map(|c| c.to_ascii_lowercase()).collect();
    if letters.is_empty() {
        return false;
    }

    if !allow_fjwz && letters.iter().any(|&c| is_foreign_letter(c)) {
        return true;
    }

    let is_vowel = |c: char| matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y');
    let first_vowel = letters.iter().position(|&c| is_vowel(c));

    match first_vowel {
        None => {
            // A single consonant pending more input is fine; longer
            // vowel-less sequences are not Vietnamese.
            letters.len() > 1
        }
        Some(pos) => {
            // Onsets are at most two letters, three only for "ngh".
            if pos > 3 || (pos == 3 && letters[..3] != ['n', 'g', 'h']) {
                return true;
            }
            if pos == 2 {
                let onset: String = letters[..2].iter().collect();
                let legal_digraph = matches!(
                    onset.as_str(),
                    "ch" | "gh" | "gi" | "kh" | "ng" | "nh" | "ph" | "qu" | "th" | "tr"
                );
                if !legal_digraph {
                    return true;
                }
            }
            // Clusters that only occur in loanwords, anywhere in the word.
            if letters.windows(2).any(|w| {
                let pair: String = w.iter().collect();
                FOREIGN_ONSETS.contains(pair.as_str())
            }) {
                return true;
            }
            // "ou" never occurs in a Vietnamese nucleus.
            letters.windows(2).any(|w| w[0] == 'o' && w[1] == 'u')
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vietnamese_words_pass() {
        for word in ["viet", "nam", "nghia", "chuyen", "khuyu", "quan", "tra", "hoa"] {
            assert!(!is_foreign_word(word, true), "{word} misclassified as foreign");
        }
    }

    #[test]
    fn test_english_clusters_fail() {
        for word in ["state", "blue", "pro", "script", "flow"] {
            assert!(is_foreign_word(word, true), "{word} misclassified as Vietnamese");
        }
    }

    #[test]
    fn test_foreign_letters() {
        assert!(is_foreign_word("jazz", false));
        assert!(is_foreign_word("word", false));
        // With the letters allowed, only structure counts.
        assert!(!is_foreign_word("za", true));
    }

    #[test]
    fn test_ngh_onset_is_legal() {
        assert!(!is_foreign_word("nghe", true));
        assert!(!is_foreign_word("nghieng", true));
    }

    #[test]
    fn test_ou_nucleus_fails() {
        assert!(is_foreign_word("you", true));
        assert!(is_foreign_word("house", true));
    }

    #[test]
    fn test_vowelless_sequences() {
        assert!(!is_foreign_word("t", true));
        assert!(is_foreign_word("tnt", true));
        assert!(!is_foreign_word("", true));
    }
}
