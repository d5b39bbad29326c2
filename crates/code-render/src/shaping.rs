//! Arabic caption shaping for engines that place glyphs one by one.
//!
//! PDF text is drawn glyph by glyph in the order given, so Arabic letters
//! must already be in their contextual presentation forms and in visual
//! order. [`shape_arabic`] picks the joining form of each letter (logical
//! order) and [`visual_text`] then reorders the line with the Unicode
//! bidirectional algorithm.

use unicode_bidi::BidiInfo;

const TATWEEL: char = '\u{0640}';
const LAM: char = '\u{0644}';

/// Base letter and its isolated, final, initial and medial forms.
/// Right-joining letters have no initial or medial form (`0`).
const FORMS: &[(char, [u32; 4])] = &[
    ('\u{0621}', [0xFE80, 0, 0, 0]),
    ('\u{0622}', [0xFE81, 0xFE82, 0, 0]),
    ('\u{0623}', [0xFE83, 0xFE84, 0, 0]),
    ('\u{0624}', [0xFE85, 0xFE86, 0, 0]),
    ('\u{0625}', [0xFE87, 0xFE88, 0, 0]),
    ('\u{0626}', [0xFE89, 0xFE8A, 0xFE8B, 0xFE8C]),
    ('\u{0627}', [0xFE8D, 0xFE8E, 0, 0]),
    ('\u{0628}', [0xFE8F, 0xFE90, 0xFE91, 0xFE92]),
    ('\u{0629}', [0xFE93, 0xFE94, 0, 0]),
    ('\u{062A}', [0xFE95, 0xFE96, 0xFE97, 0xFE98]),
    ('\u{062B}', [0xFE99, 0xFE9A, 0xFE9B, 0xFE9C]),
    ('\u{062C}', [0xFE9D, 0xFE9E, 0xFE9F, 0xFEA0]),
    ('\u{062D}', [0xFEA1, 0xFEA2, 0xFEA3, 0xFEA4]),
    ('\u{062E}', [0xFEA5, 0xFEA6, 0xFEA7, 0xFEA8]),
    ('\u{062F}', [0xFEA9, 0xFEAA, 0, 0]),
    ('\u{0630}', [0xFEAB, 0xFEAC, 0, 0]),
    ('\u{0631}', [0xFEAD, 0xFEAE, 0, 0]),
    ('\u{0632}', [0xFEAF, 0xFEB0, 0, 0]),
    ('\u{0633}', [0xFEB1, 0xFEB2, 0xFEB3, 0xFEB4]),
    ('\u{0634}', [0xFEB5, 0xFEB6, 0xFEB7, 0xFEB8]),
    ('\u{0635}', [0xFEB9, 0xFEBA, 0xFEBB, 0xFEBC]),
    ('\u{0636}', [0xFEBD, 0xFEBE, 0xFEBF, 0xFEC0]),
    ('\u{0637}', [0xFEC1, 0xFEC2, 0xFEC3, 0xFEC4]),
    ('\u{0638}', [0xFEC5, 0xFEC6, 0xFEC7, 0xFEC8]),
    ('\u{0639}', [0xFEC9, 0xFECA, 0xFECB, 0xFECC]),
    ('\u{063A}', [0xFECD, 0xFECE, 0xFECF, 0xFED0]),
    ('\u{0641}', [0xFED1, 0xFED2, 0xFED3, 0xFED4]),
    ('\u{0642}', [0xFED5, 0xFED6, 0xFED7, 0xFED8]),
    ('\u{0643}', [0xFED9, 0xFEDA, 0xFEDB, 0xFEDC]),
    ('\u{0644}', [0xFEDD, 0xFEDE, 0xFEDF, 0xFEE0]),
    ('\u{0645}', [0xFEE1, 0xFEE2, 0xFEE3, 0xFEE4]),
    ('\u{0646}', [0xFEE5, 0xFEE6, 0xFEE7, 0xFEE8]),
    ('\u{0647}', [0xFEE9, 0xFEEA, 0xFEEB, 0xFEEC]),
    ('\u{0648}', [0xFEED, 0xFEEE, 0, 0]),
    ('\u{0649}', [0xFEEF, 0xFEF0, 0, 0]),
    ('\u{064A}', [0xFEF1, 0xFEF2, 0xFEF3, 0xFEF4]),
];

/// Lam followed by an alef: isolated and final ligature.
const LAM_ALEF: &[(char, [u32; 2])] = &[
    ('\u{0622}', [0xFEF5, 0xFEF6]),
    ('\u{0623}', [0xFEF7, 0xFEF8]),
    ('\u{0625}', [0xFEF9, 0xFEFA]),
    ('\u{0627}', [0xFEFB, 0xFEFC]),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Joining {
    None,
    Right,
    Dual,
    /// Tatweel: joins on both sides but has no forms of its own.
    Causing,
}

fn forms(c: char) -> Option<[u32; 4]> {
    FORMS.iter().find(|(base, _)| *base == c).map(|(_, f)| *f)
}

fn joining(c: char) -> Joining {
    if c == TATWEEL {
        return Joining::Causing;
    }
    match forms(c) {
        Some([_, 0, _, _]) => Joining::None,
        Some([_, _, 0, _]) => Joining::Right,
        Some(_) => Joining::Dual,
        None => Joining::None,
    }
}

/// Harakat and other marks that sit on a letter without breaking joins.
fn is_transparent(c: char) -> bool {
    matches!(
        c,
        '\u{0610}'..='\u{061A}' | '\u{064B}'..='\u{065F}' | '\u{0670}' | '\u{06D6}'..='\u{06ED}'
    )
}

fn joins_left(j: Joining) -> bool {
    matches!(j, Joining::Dual | Joining::Causing)
}

fn joins_right(j: Joining) -> bool {
    matches!(j, Joining::Dual | Joining::Right | Joining::Causing)
}

fn to_char(code: u32, fallback: char) -> char {
    char::from_u32(code).unwrap_or(fallback)
}

/// Replace Arabic letters with their contextual presentation forms.
///
/// The result stays in logical order. Lam-alef pairs become one ligature and
/// vowel marks are dropped, since they cannot be positioned without a
/// shaping engine. Text without Arabic letters is returned unchanged.
pub fn shape_arabic(text: &str) -> String {
    let letters: Vec<char> = text.chars().filter(|c| !is_transparent(*c)).collect();
    if !letters.iter().any(|c| forms(*c).is_some()) {
        return letters.into_iter().collect();
    }

    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    while i < letters.len() {
        let c = letters[i];
        let Some(f) = forms(c) else {
            out.push(c);
            i += 1;
            continue;
        };

        let joins_prev = i > 0 && joins_right(joining(c)) && joins_left(joining(letters[i - 1]));

        if c == LAM {
            if let Some(next) = letters.get(i + 1) {
                if let Some((_, lig)) = LAM_ALEF.iter().find(|(alef, _)| alef == next) {
                    let code = if joins_prev { lig[1] } else { lig[0] };
                    out.push(to_char(code, c));
                    i += 2;
                    continue;
                }
            }
        }

        let joins_next = joins_left(joining(c))
            && letters
                .get(i + 1)
                .is_some_and(|next| joins_right(joining(*next)));

        let code = match (joins_prev, joins_next) {
            (false, false) => f[0],
            (true, false) => f[1],
            (false, true) => f[2],
            (true, true) => f[3],
        };
        out.push(to_char(code, c));
        i += 1;
    }
    out
}

/// Shape `text` and lay it out in visual (left-to-right drawing) order.
pub fn visual_text(text: &str) -> String {
    let shaped = shape_arabic(text);
    let info = BidiInfo::new(&shaped, None);
    let mut out = String::with_capacity(shaped.len());
    for para in &info.paragraphs {
        out.push_str(&info.reorder_line(para, para.range.clone()));
    }
    out
}
