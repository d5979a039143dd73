//! English cardinal numbers ("eighty-five", "one hundred and five").

const ONES: [&str; 20] = [
    "zero",
    "one",
    "two",
    "three",
    "four",
    "five",
    "six",
    "seven",
    "eight",
    "nine",
    "ten",
    "eleven",
    "twelve",
    "thirteen",
    "fourteen",
    "fifteen",
    "sixteen",
    "seventeen",
    "eighteen",
    "nineteen",
];

const TENS: [&str; 10] = [
    "", "", "twenty", "thirty", "forty", "fifty", "sixty", "seventy", "eighty", "ninety",
];

const SCALES: [&str; 7] = [
    "",
    "thousand",
    "million",
    "billion",
    "trillion",
    "quadrillion",
    "quintillion",
];

/// Spells a finite number. Returns `None` for non-finite values or integer parts past `u64`.
pub fn cardinal(value: f64) -> Option<String> {
    if !value.is_finite() {
        return None;
    }

    // Shortest round-trip form: 85.0 -> "85", 72.5 -> "72.5".
    let rendered = value.abs().to_string();
    let (integer, fraction) = rendered.split_once('.').unwrap_or((rendered.as_str(), ""));
    let integer: u64 = integer.parse().ok()?;

    let mut words = spell_integer(integer);
    if !fraction.is_empty() {
        words.push_str(" point");
        for digit in fraction.chars().filter_map(|c| c.to_digit(10)) {
            words.push(' ');
            words.push_str(ONES[digit as usize]);
        }
    }

    if value < 0.0 && (integer != 0 || !fraction.is_empty()) {
        words.insert_str(0, "minus ");
    }
    Some(words)
}

pub fn spell_integer(value: u64) -> String {
    if value == 0 {
        return ONES[0].to_string();
    }

    let mut groups = Vec::new();
    let mut rest = value;
    while rest > 0 {
        groups.push((rest % 1000) as usize);
        rest /= 1000;
    }

    let mut parts: Vec<String> = Vec::new();
    for (scale, &group) in groups.iter().enumerate().rev() {
        if group == 0 {
            continue;
        }
        let mut part = spell_below_thousand(group);
        if scale > 0 {
            part.push(' ');
            part.push_str(SCALES[scale]);
        }
        parts.push(part);
    }

    // "one thousand and five": a trailing group under 100 joins with "and".
    let last = groups[0];
    if groups.len() > 1 && last > 0 && last < 100 {
        let tail = parts.pop().unwrap_or_default();
        let head = parts.join(", ");
        return format!("{head} and {tail}");
    }
    parts.join(", ")
}

fn spell_below_thousand(value: usize) -> String {
    let hundreds = value / 100;
    let rest = value % 100;
    match (hundreds, rest) {
        (0, rest) => spell_below_hundred(rest),
        (h, 0) => format!("{} hundred", ONES[h]),
        (h, rest) => format!("{} hundred and {}", ONES[h], spell_below_hundred(rest)),
    }
}

fn spell_below_hundred(value: usize) -> String {
    if value < 20 {
        return ONES[value].to_string();
    }
    match value % 10 {
        0 => TENS[value / 10].to_string(),
        ones => format!("{}-{}", TENS[value / 10], ONES[ones]),
    }
}
