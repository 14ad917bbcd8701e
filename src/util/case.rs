// Copyright (c) 2026 Unfolded Circle ApS
// SPDX-License-Identifier: MPL-2.0

/// Convert a snake_case configuration name to the camelCase name used by the device API.
///
/// `fixed_notifications_visibility` -> `fixedNotificationsVisibility`
pub fn to_camel_case(snake: &str) -> String {
    let mut parts = snake.split('_');
    let mut camel = String::with_capacity(snake.len());
    if let Some(first) = parts.next() {
        camel.push_str(first);
    }
    for part in parts {
        let mut chars = part.chars();
        if let Some(c) = chars.next() {
            camel.extend(c.to_uppercase());
            // same as Python's str.capitalize: remaining characters are lower case
            camel.push_str(&chars.as_str().to_lowercase());
        }
    }
    camel
}
