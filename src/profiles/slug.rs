use rand::Rng;

pub const SUFFIX_LEN: usize = 10;
const SUFFIX_ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz_-";

/// Lower-cased words of `name` joined by `-`, keeping only ASCII alphanumerics, `-` and `_`.
pub fn slugify(name: &str) -> String {
    name.split_whitespace()
        .map(|word| {
            word.chars()
                .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
                .map(|c| c.to_ascii_lowercase())
                .collect::<String>()
        })
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// A fresh public slug for `name`: the slugified name plus a random suffix.
pub fn generate(name: &str) -> String {
    let base = slugify(name);
    let suffix = random_suffix();
    if base.is_empty() {
        suffix
    } else {
        format!("{base}-{suffix}")
    }
}

fn random_suffix() -> String {
    let mut rng = rand::rng();
    (0..SUFFIX_LEN)
        .map(|_| SUFFIX_ALPHABET[rng.random_range(0..SUFFIX_ALPHABET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_names() {
        assert_eq!(slugify("My BF"), "my-bf");
        assert_eq!(slugify("  lots   of\tspace "), "lots-of-space");
        assert_eq!(slugify("Tom & Jerry's"), "tom-jerrys");
        assert_eq!(slugify("💀"), "");
    }

    #[test]
    fn generated_slug_shape() {
        let slug = generate("My BF");
        let suffix = slug.strip_prefix("my-bf-").unwrap();
        assert_eq!(suffix.len(), SUFFIX_LEN);
        assert!(suffix.bytes().all(|b| SUFFIX_ALPHABET.contains(&b)));

        assert_eq!(generate("🔥🔥").len(), SUFFIX_LEN);
    }

    #[test]
    fn suffixes_differ() {
        assert_ne!(generate("same"), generate("same"));
    }
}
