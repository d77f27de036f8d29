/// Avatar colours, picked for contrast against white initials.
pub const PROFILE_PALETTE: [(u8, u8, u8); 15] = [
    (0x00, 0x38, 0xFF),
    (0x00, 0xBE, 0xE8),
    (0x6E, 0x52, 0xFF),
    (0x93, 0x27, 0xFF),
    (0x00, 0x9A, 0x87),
    (0x39, 0x85, 0x00),
    (0xE7, 0x00, 0xF9),
    (0xC4, 0x00, 0x6B),
    (0xF0, 0x32, 0x11),
    (0xE3, 0x50, 0x00),
    (0xF2, 0xA8, 0x00),
    (0xE0, 0xAF, 0x00),
    (0xD7, 0xC7, 0x00),
    (0xFF, 0x46, 0x46),
    (0xFF, 0x7A, 0x00),
];

/// Colour shown for assignees that are not in the contact list.
pub const UNKNOWN_PROFILE: (u8, u8, u8) = (0x99, 0x99, 0x99);

/// Stable palette colour for `key` (a contact id), so a contact keeps its colour across runs.
pub fn profile_color(key: &str) -> Option<(u8, u8, u8)> {
    if key.is_empty() {
        return None;
    }
    // Only the shift is done in 32 bits; the sum keeps growing past i32, so long
    // keys land on the same colour the web client picks.
    let hash = key.encode_utf16().fold(0i64, |hash, unit| {
        let shifted = (hash as i32).wrapping_shl(5) as i64;
        (unit as i64).wrapping_add(shifted.wrapping_sub(hash))
    });
    let index = (hash.unsigned_abs() % PROFILE_PALETTE.len() as u64) as usize;
    Some(PROFILE_PALETTE[index])
}

/// Shortens `value` to about `max_len` characters, cutting at the nearest space and adding `...`.
pub fn truncate(value: &str, max_len: usize) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= max_len {
        return value.to_string();
    }

    let previous_space = chars[..=max_len.min(chars.len() - 1)]
        .iter()
        .rposition(|&c| c == ' ');
    let next_space = chars[max_len..]
        .iter()
        .position(|&c| c == ' ')
        .map(|offset| max_len + offset);

    let cut = match (previous_space, next_space) {
        (None, None) => max_len,
        (None, Some(next)) => next,
        (Some(previous), None) => previous,
        (Some(previous), Some(next)) => {
            if max_len - previous <= next - max_len {
                previous
            } else {
                next
            }
        }
    };

    let head: String = chars[..cut].iter().collect();
    format!("{}...", head.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_strings_untouched() {
        assert_eq!(truncate("Kanban", 10), "Kanban");
        assert_eq!(truncate("", 3), "");
    }

    #[test]
    fn test_cuts_at_nearest_space() {
        assert_eq!(
            truncate("Build the contact list page", 12),
            "Build the..."
        );
        assert_eq!(
            truncate("Refactor authentication flow", 16),
            "Refactor authentication..."
        );
    }

    #[test]
    fn test_prefers_following_space_when_closer() {
        assert_eq!(truncate("a bcdefghij klm", 10), "a bcdefghij...");
    }

    #[test]
    fn test_no_space_cuts_hard() {
        assert_eq!(truncate("Supercalifragilistic", 5), "Super...");
    }

    #[test]
    fn test_profile_color_is_stable() {
        assert_eq!(profile_color(""), None);
        assert_eq!(profile_color("42"), profile_color("42"));
        // '1' is 49; 49 % 15 == 4
        assert_eq!(profile_color("1"), Some(PROFILE_PALETTE[4]));
    }

    #[test]
    fn test_profile_color_long_keys_match_web_client() {
        assert_eq!(profile_color("Anna Schmidt"), Some(PROFILE_PALETTE[11]));
        assert_eq!(profile_color(&"a".repeat(20)), Some(PROFILE_PALETTE[4]));
    }
}
