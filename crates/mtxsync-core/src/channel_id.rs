// ── Channel identifiers ──
//
// Channel names are free text (usually Cyrillic) while MediaMTX path names
// must be URL-safe. `derive_id` produces the slug; `assign_ids` makes the
// slugs unique within one directory snapshot.

use std::borrow::Borrow;
use std::fmt;

use indexmap::IndexMap;

use mtxsync_api::Channel;

/// Separator used between alphanumeric runs and before collision suffixes.
const SEPARATOR: char = '_';

/// Id used when a name has no transliterable characters at all.
const FALLBACK_ID: &str = "channel";

/// Snapshot of the channel directory keyed by derived id, in assignment order.
pub type ChannelMap = IndexMap<ChannelId, Channel>;

// ── ChannelId ───────────────────────────────────────────────────────

/// URL-safe, collision-free identifier of a channel within a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChannelId(String);

impl ChannelId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for ChannelId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// ── Derivation ──────────────────────────────────────────────────────

/// Latin spelling of a lowercase Russian letter. Other Cyrillic letters
/// have none and end up as separators.
fn transliterate(c: char) -> Option<&'static str> {
    let latin = match c {
        'а' => "a",
        'б' => "b",
        'в' => "v",
        'г' => "g",
        'д' => "d",
        'е' | 'ё' | 'э' => "e",
        'ж' => "zh",
        'з' => "z",
        'и' => "i",
        'й' => "j",
        'к' => "k",
        'л' => "l",
        'м' => "m",
        'н' => "n",
        'о' => "o",
        'п' => "p",
        'р' => "r",
        'с' => "s",
        'т' => "t",
        'у' => "u",
        'ф' => "f",
        'х' => "h",
        'ц' => "ts",
        'ч' => "ch",
        'ш' => "sh",
        'щ' => "sch",
        // Hard and soft signs become apostrophes, i.e. separators.
        'ъ' | 'ь' => "'",
        'ы' => "y",
        'ю' => "ju",
        'я' => "ja",
        _ => return None,
    };
    Some(latin)
}

/// Derive the base id for a channel name.
///
/// Lowercases, transliterates Cyrillic to Latin, and collapses every run of
/// characters outside `[0-9a-z]` into a single `_`, with no leading or
/// trailing separator. The result always matches `^[0-9a-z]+(_[0-9a-z]+)*$`.
pub fn derive_id(name: &str) -> String {
    let mut id = String::with_capacity(name.len());
    let mut pending_separator = false;

    let mut push = |c: char, id: &mut String| {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_separator && !id.is_empty() {
                id.push(SEPARATOR);
            }
            pending_separator = false;
            id.push(c);
        } else {
            pending_separator = true;
        }
    };

    for c in name.chars().flat_map(char::to_lowercase) {
        match transliterate(c) {
            Some(latin) => latin.chars().for_each(|l| push(l, &mut id)),
            None => push(c, &mut id),
        }
    }

    if id.is_empty() {
        FALLBACK_ID.to_owned()
    } else {
        id
    }
}

// ── Collision resolution ────────────────────────────────────────────

/// First free id for `name`: the base id, else `<base>_2`, `<base>_3`, ...
fn unique_id(taken: &ChannelMap, name: &str) -> ChannelId {
    let base = derive_id(name);
    if !taken.contains_key(base.as_str()) {
        return ChannelId(base);
    }

    let mut suffix = 2_u32;
    loop {
        let candidate = format!("{base}{SEPARATOR}{suffix}");
        if !taken.contains_key(candidate.as_str()) {
            return ChannelId(candidate);
        }
        suffix += 1;
    }
}

/// Assign a unique id to every channel.
///
/// Channels are processed in ascending `(name, guid)` order, so the same
/// directory always yields the same assignment regardless of the order the
/// VMS listed it in.
pub fn assign_ids(mut channels: Vec<Channel>) -> ChannelMap {
    channels.sort_by(|a, b| (&a.name, &a.guid).cmp(&(&b.name, &b.guid)));

    channels
        .into_iter()
        .fold(ChannelMap::new(), |mut assigned, channel| {
            let id = unique_id(&assigned, &channel.name);
            assigned.insert(id, channel);
            assigned
        })
}
