//! Grouping items by class key.

use std::cmp::Ordering;
use std::collections::HashMap;

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Items sharing one key, in first-seen order.
#[derive(Debug, Clone, PartialEq)]
pub struct Group<T> {
    pub key: String,
    pub items: Vec<T>,
}

impl<T> Group<T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Representative item (the first one seen).
    pub fn first(&self) -> Option<&T> {
        self.items.first()
    }
}

/// Split items into groups by `key`.
///
/// Items keep their relative order inside a group; groups are sorted with
/// [`collate`].
pub fn group_by_key<T, I, F>(items: I, key: F) -> Vec<Group<T>>
where
    I: IntoIterator<Item = T>,
    F: for<'a> Fn(&'a T) -> &'a str,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<Group<T>> = Vec::new();

    for item in items {
        let k = key(&item);
        match index.get(k) {
            Some(&i) => groups[i].items.push(item),
            None => {
                index.insert(k.to_string(), groups.len());
                groups.push(Group {
                    key: k.to_string(),
                    items: vec![item],
                });
            }
        }
    }

    groups.sort_by(|a, b| collate(&a.key, &b.key));
    groups
}

/// Locale-style ordering for class keys, Arabic alphabet first.
///
/// Keys are compared in three levels. The base letters decide first, with
/// punctuation before digits, digits before Arabic letters and Arabic letters
/// before Latin ones. Accents and hamza forms come next, so `أ` sorts as a
/// variant of `ا`. Case is last, lowercase first. Identical keys under all
/// three fall back to code-point order so the result is total.
pub fn collate(a: &str, b: &str) -> Ordering {
    SortKey::new(a).cmp(&SortKey::new(b)).then_with(|| a.cmp(b))
}

/// Character classes in collation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum CharClass {
    Space,
    Punctuation,
    Digit,
    Arabic,
    Letter,
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct SortKey {
    base: Vec<(CharClass, char)>,
    accents: Vec<char>,
    upper: Vec<bool>,
}

impl SortKey {
    fn new(s: &str) -> Self {
        let accents = s
            .nfd()
            .filter(|c| *c != TATWEEL)
            .flat_map(char::to_lowercase)
            .collect();
        let upper = s
            .nfd()
            .filter(|c| c.is_alphabetic())
            .map(char::is_uppercase)
            .collect();
        Self {
            base: primary_key(s),
            accents,
            upper,
        }
    }
}

const TATWEEL: char = '\u{0640}';

fn primary_key(s: &str) -> Vec<(CharClass, char)> {
    s.nfkd()
        .filter(|c| *c != TATWEEL && !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .map(|c| {
            let c = fold_digit(c);
            (class_of(c), c)
        })
        .collect()
}

/// Arabic-Indic digits weigh the same as ASCII ones.
fn fold_digit(c: char) -> char {
    let zero = match c {
        '\u{0660}'..='\u{0669}' => 0x0660,
        '\u{06F0}'..='\u{06F9}' => 0x06F0,
        _ => return c,
    };
    char::from(b'0' + (c as u32 - zero) as u8)
}

fn class_of(c: char) -> CharClass {
    if c.is_whitespace() {
        CharClass::Space
    } else if c.is_ascii_digit() || c.is_numeric() {
        CharClass::Digit
    } else if !c.is_alphabetic() {
        CharClass::Punctuation
    } else if is_arabic(c) {
        CharClass::Arabic
    } else {
        CharClass::Letter
    }
}

fn is_arabic(c: char) -> bool {
    matches!(
        c,
        '\u{0600}'..='\u{06FF}'
            | '\u{0750}'..='\u{077F}'
            | '\u{08A0}'..='\u{08FF}'
            | '\u{FB50}'..='\u{FDFF}'
            | '\u{FE70}'..='\u{FEFF}'
    )
}
