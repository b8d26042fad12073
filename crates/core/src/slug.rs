//! URL slug generation and href path rewriting.
//!
//! Slugs identify menus in public URLs (`/{slug}`) and appear as the
//! category segment of treatment hrefs (`/{base}/{category}/{slug}`), so a
//! menu rename has to rewrite those segments everywhere.

/// Generate a URL-safe slug from a display name.
///
/// Lowercases and trims the input, turns whitespace and `+` into hyphens,
/// drops every character outside `[a-z0-9-]`, collapses consecutive hyphens
/// and trims leading/trailing hyphens. The result is either empty or matches
/// `^[a-z0-9]+(-[a-z0-9]+)*$`, so `slugify(slugify(x)) == slugify(x)`.
pub fn slugify(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut prev_hyphen = false;

    for c in input.trim().to_lowercase().chars() {
        let mapped = if c.is_whitespace() || c == '+' || c == '-' {
            '-'
        } else if c.is_ascii_lowercase() || c.is_ascii_digit() {
            c
        } else {
            continue;
        };

        if mapped == '-' {
            if !prev_hyphen {
                result.push('-');
            }
            prev_hyphen = true;
        } else {
            result.push(mapped);
            prev_hyphen = false;
        }
    }

    result.trim_matches('-').to_string()
}

/// Whether `slug` is a non-empty slug in canonical form.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty() && slugify(slug) == slug
}

/// Replace the category segment of a treatment href when it equals `old`.
///
/// Treatment hrefs have the shape `/{base}/{category}/{slug}`, and the
/// category is the position [`ProductKey::from_href`] reads. Only that
/// segment is rewritten, and only when another segment follows it. The base
/// and the slug are left alone even when they equal `old`, as are segments
/// that merely contain it (`/old-school/`). Returns `None` when nothing
/// changed.
///
/// [`ProductKey::from_href`]: crate::enrichment::ProductKey::from_href
pub fn replace_category_segment(href: &str, old: &str, new: &str) -> Option<String> {
    if old.is_empty() || old == new {
        return None;
    }

    let mut parts: Vec<&str> = href.split('/').collect();
    let mut non_empty = parts
        .iter()
        .enumerate()
        .filter(|(_, part)| !part.is_empty())
        .map(|(i, _)| i);
    let category = non_empty.nth(1)?;
    // A slug segment must follow.
    non_empty.next()?;

    if parts[category] != old {
        return None;
    }
    parts[category] = new;
    Some(parts.join("/"))
}
