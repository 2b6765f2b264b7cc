//! Short-name derivation for states that do not declare one.
//!
//! The derived name must be stable for a given identifier: it is what gets
//! persisted, so it may only change when the variant itself is renamed.

/// Derive the short name of a variant from its identifier and the name of
/// its family.
///
/// The trailing CamelCase word of the family (`State` in `PaymentState`) is
/// stripped from the variant when the variant ends with it and something is
/// left over; the rest is converted to `snake_case`.
///
/// ```rust
/// use entity_states::core::derive_short_name;
///
/// assert_eq!(derive_short_name("PaymentState", "PaidState"), "paid");
/// assert_eq!(derive_short_name("PaymentState", "PartiallyRefunded"), "partially_refunded");
/// assert_eq!(derive_short_name("PaymentState", "State"), "state");
/// ```
pub fn derive_short_name(family: &str, variant: &str) -> String {
    let suffix = last_camel_word(family);
    let stem = match variant.strip_suffix(suffix) {
        Some(stem) if !suffix.is_empty() && !stem.is_empty() => stem,
        _ => variant,
    };
    to_snake_case(stem)
}

fn last_camel_word(name: &str) -> &str {
    let start = name
        .char_indices()
        .rev()
        .find(|(_, c)| c.is_uppercase())
        .map(|(i, _)| i)
        .unwrap_or(0);
    &name[start..]
}

fn to_snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() {
            let prev = i.checked_sub(1).map(|p| chars[p]);
            let next = chars.get(i + 1).copied();
            let boundary = match prev {
                Some(p) if p.is_lowercase() || p.is_ascii_digit() => true,
                // "HTTPServer" -> "http_server"
                Some(p) if p.is_uppercase() => next.is_some_and(|n| n.is_lowercase()),
                _ => false,
            };
            if boundary && !out.ends_with('_') {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_family_suffix() {
        assert_eq!(derive_short_name("OrderState", "ShippedState"), "shipped");
        assert_eq!(derive_short_name("Status", "ActiveStatus"), "active");
    }

    #[test]
    fn keeps_variant_without_suffix() {
        assert_eq!(derive_short_name("OrderState", "Shipped"), "shipped");
        assert_eq!(derive_short_name("OrderState", "AwaitingPickup"), "awaiting_pickup");
    }

    #[test]
    fn never_strips_to_empty() {
        assert_eq!(derive_short_name("OrderState", "State"), "state");
    }

    #[test]
    fn handles_acronyms_and_digits() {
        assert_eq!(derive_short_name("Phase", "HTTPRetry"), "http_retry");
        assert_eq!(derive_short_name("Phase", "Step2Done"), "step2_done");
        assert_eq!(derive_short_name("Phase", "A"), "a");
    }

    #[test]
    fn family_without_uppercase_uses_whole_name_as_suffix() {
        assert_eq!(derive_short_name("state", "Openstate"), "open");
    }

    #[test]
    fn derivation_is_stable() {
        let first = derive_short_name("PaymentState", "PendingState");
        let second = derive_short_name("PaymentState", "PendingState");
        assert_eq!(first, second);
    }
}
