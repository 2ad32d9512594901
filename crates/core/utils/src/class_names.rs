//! Conditional class-name joining with Tailwind-style conflict resolution.
//!
//! [`cn`] flattens its inputs into a single class list, then drops every class
//! overridden by a later class in the same conflict group. Groups are scoped by
//! variant modifiers (`hover:`, `md:`) and the important marker (`!`), so
//! `hover:p-2` never removes `p-4`. Shorthand groups also override their
//! longhands: a later `p-4` removes an earlier `px-2`, but not the other way
//! round.
//!
//! Only the common utility groups are recognised. Unknown classes are kept
//! verbatim.

use std::collections::HashSet;

/// A class-name input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassValue {
    /// One or more whitespace-separated classes.
    Str(String),
    /// A class included only when the flag is set.
    Toggle(String, bool),
    /// A nested list of inputs.
    List(Vec<ClassValue>),
    /// Contributes nothing.
    Empty,
}

impl From<&str> for ClassValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for ClassValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<&String> for ClassValue {
    fn from(value: &String) -> Self {
        Self::Str(value.clone())
    }
}

impl From<(&str, bool)> for ClassValue {
    fn from((name, enabled): (&str, bool)) -> Self {
        Self::Toggle(name.to_string(), enabled)
    }
}

impl From<(String, bool)> for ClassValue {
    fn from((name, enabled): (String, bool)) -> Self {
        Self::Toggle(name, enabled)
    }
}

impl<T: Into<ClassValue>> From<Option<T>> for ClassValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Empty, Into::into)
    }
}

impl<T: Into<ClassValue>> From<Vec<T>> for ClassValue {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

impl ClassValue {
    fn collect_into<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Self::Str(s) => out.extend(s.split_whitespace()),
            Self::Toggle(s, true) => out.extend(s.split_whitespace()),
            Self::Toggle(_, false) | Self::Empty => {}
            Self::List(values) => values.iter().for_each(|v| v.collect_into(out)),
        }
    }
}

/// Joins inputs into a class string, resolving Tailwind conflicts.
///
/// ```
/// use imaginify_utils::class_names::{cn, ClassValue};
///
/// let classes = cn([
///     ClassValue::from("px-2 py-1 text-red-500"),
///     ClassValue::from(("p-4", true)),
///     ClassValue::from(("hidden", false)),
/// ]);
/// assert_eq!(classes, "text-red-500 p-4");
/// ```
pub fn cn<I>(inputs: I) -> String
where
    I: IntoIterator<Item = ClassValue>,
{
    let inputs: Vec<ClassValue> = inputs.into_iter().collect();
    let mut classes = Vec::new();
    for input in &inputs {
        input.collect_into(&mut classes);
    }
    merge_classes(&classes)
}

/// Builds a class string from heterogeneous inputs.
///
/// ```
/// use imaginify_utils::cn;
///
/// let active = true;
/// assert_eq!(cn!("btn p-2", ("btn-active", active), None::<&str>, "p-3"), "btn btn-active p-3");
/// ```
#[macro_export]
macro_rules! cn {
    ($($input:expr),* $(,)?) => {
        $crate::class_names::cn([$($crate::class_names::ClassValue::from($input)),*])
    };
}

/// Drops classes overridden by later classes in the same conflict scope.
pub fn merge_classes(classes: &[&str]) -> String {
    let mut claimed: HashSet<String> = HashSet::new();
    let mut kept: Vec<&str> = Vec::with_capacity(classes.len());

    for &class in classes.iter().rev() {
        let parsed = ParsedClass::parse(class);
        let Some(group) = class_group(parsed.base) else {
            kept.push(class);
            continue;
        };

        let scope = parsed.scope();
        if !claimed.insert(format!("{scope}{group}")) {
            continue;
        }
        for longhand in conflicting_groups(group) {
            claimed.insert(format!("{scope}{longhand}"));
        }
        kept.push(class);
    }

    kept.reverse();
    kept.join(" ")
}

struct ParsedClass<'a> {
    modifiers: Vec<&'a str>,
    important: bool,
    base: &'a str,
}

impl<'a> ParsedClass<'a> {
    fn parse(class: &'a str) -> Self {
        let mut modifiers = Vec::new();
        let mut depth = 0usize;
        let mut start = 0;

        for (i, ch) in class.char_indices() {
            match ch {
                '[' => depth += 1,
                ']' => depth = depth.saturating_sub(1),
                ':' if depth == 0 => {
                    modifiers.push(&class[start..i]);
                    start = i + 1;
                }
                _ => {}
            }
        }

        let mut base = &class[start..];
        let important = base.starts_with('!');
        if important {
            base = &base[1..];
        }
        // Negative values share a group with their positive form.
        let base = base.strip_prefix('-').unwrap_or(base);

        modifiers.sort_unstable();
        Self {
            modifiers,
            important,
            base,
        }
    }

    fn scope(&self) -> String {
        let mut scope = self.modifiers.join(":");
        scope.push('|');
        if self.important {
            scope.push('!');
        }
        scope
    }
}

const DISPLAY: &[&str] = &[
    "block",
    "inline-block",
    "inline",
    "flex",
    "inline-flex",
    "grid",
    "inline-grid",
    "contents",
    "table",
    "hidden",
];

const POSITION: &[&str] = &["static", "fixed", "absolute", "relative", "sticky"];

const FONT_SIZES: &[&str] = &[
    "xs", "sm", "base", "lg", "xl", "2xl", "3xl", "4xl", "5xl", "6xl", "7xl", "8xl", "9xl",
];

const TEXT_ALIGN: &[&str] = &["left", "center", "right", "justify", "start", "end"];

const FONT_WEIGHTS: &[&str] = &[
    "thin",
    "extralight",
    "light",
    "normal",
    "medium",
    "semibold",
    "bold",
    "extrabold",
    "black",
];

const BORDER_STYLES: &[&str] = &["solid", "dashed", "dotted", "double", "hidden", "none"];

// Longer prefixes first so `px` wins over `p`.
const PREFIX_GROUPS: &[&str] = &[
    "px", "py", "pt", "pr", "pb", "pl", "ps", "pe", "p", "mx", "my", "mt", "mr", "mb", "ml", "ms",
    "me", "m", "min-w", "min-h", "max-w", "max-h", "size", "w", "h", "gap-x", "gap-y", "gap",
    "inset-x", "inset-y", "inset", "top", "right", "bottom", "left", "z", "opacity", "cursor",
    "overflow-x", "overflow-y", "overflow", "leading", "tracking", "rounded-tl", "rounded-tr",
    "rounded-br", "rounded-bl", "rounded-ss", "rounded-se", "rounded-es", "rounded-ee", "rounded-t",
    "rounded-r", "rounded-b", "rounded-l", "rounded-s", "rounded-e", "rounded", "items",
    "justify-items", "justify-self", "justify",
];

const SHADOW_SIZES: &[&str] = &["sm", "md", "lg", "xl", "2xl", "inner", "none"];

fn has_prefix(base: &str, prefix: &str) -> bool {
    base == prefix
        || base
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('-'))
}

fn is_arbitrary_length(value: &str) -> bool {
    value
        .strip_prefix('[')
        .is_some_and(|inner| inner.starts_with(|c: char| c.is_ascii_digit()))
}

fn class_group(base: &str) -> Option<&'static str> {
    if DISPLAY.contains(&base) {
        return Some("display");
    }
    if POSITION.contains(&base) {
        return Some("position");
    }
    if matches!(base, "flex-row" | "flex-row-reverse" | "flex-col" | "flex-col-reverse") {
        return Some("flex-direction");
    }

    if let Some(value) = base.strip_prefix("text-") {
        return Some(if FONT_SIZES.contains(&value) || is_arbitrary_length(value) {
            "font-size"
        } else if TEXT_ALIGN.contains(&value) {
            "text-align"
        } else {
            "text-color"
        });
    }

    if let Some(value) = base.strip_prefix("font-") {
        return Some(if FONT_WEIGHTS.contains(&value) {
            "font-weight"
        } else {
            "font-family"
        });
    }

    if let Some(value) = base.strip_prefix("bg-") {
        return Some(match value {
            "auto" | "cover" | "contain" => "bg-size",
            "fixed" | "local" | "scroll" => "bg-attachment",
            "repeat" | "no-repeat" | "repeat-x" | "repeat-y" | "repeat-round" | "repeat-space" => "bg-repeat",
            "center" | "top" | "bottom" | "left" | "right" | "left-top" | "left-bottom" | "right-top"
            | "right-bottom" => "bg-position",
            _ => "bg-color",
        });
    }

    if base == "border" {
        return Some("border-width");
    }
    if let Some(value) = base.strip_prefix("border-") {
        if value.chars().all(|c| c.is_ascii_digit()) || is_arbitrary_length(value) {
            return Some("border-width");
        }
        if BORDER_STYLES.contains(&value) {
            return Some("border-style");
        }
        // Side-specific borders are not tracked.
        if matches!(value.split('-').next(), Some("x" | "y" | "t" | "r" | "b" | "l" | "s" | "e")) {
            return None;
        }
        return Some("border-color");
    }

    if base == "shadow" {
        return Some("shadow");
    }
    if let Some(value) = base.strip_prefix("shadow-") {
        return Some(if SHADOW_SIZES.contains(&value) || is_arbitrary_length(value) {
            "shadow"
        } else {
            "shadow-color"
        });
    }

    PREFIX_GROUPS
        .iter()
        .find(|&&prefix| has_prefix(base, prefix))
        .copied()
}

fn conflicting_groups(group: &str) -> &'static [&'static str] {
    match group {
        "p" => &["px", "py", "pt", "pr", "pb", "pl", "ps", "pe"],
        "px" => &["pr", "pl"],
        "py" => &["pt", "pb"],
        "m" => &["mx", "my", "mt", "mr", "mb", "ml", "ms", "me"],
        "mx" => &["mr", "ml"],
        "my" => &["mt", "mb"],
        "size" => &["w", "h"],
        "gap" => &["gap-x", "gap-y"],
        "inset" => &["inset-x", "inset-y", "top", "right", "bottom", "left"],
        "inset-x" => &["right", "left"],
        "inset-y" => &["top", "bottom"],
        "overflow" => &["overflow-x", "overflow-y"],
        "rounded" => &[
            "rounded-t",
            "rounded-r",
            "rounded-b",
            "rounded-l",
            "rounded-s",
            "rounded-e",
            "rounded-tl",
            "rounded-tr",
            "rounded-br",
            "rounded-bl",
            "rounded-ss",
            "rounded-se",
            "rounded-es",
            "rounded-ee",
        ],
        "rounded-t" => &["rounded-tl", "rounded-tr"],
        "rounded-r" => &["rounded-tr", "rounded-br"],
        "rounded-b" => &["rounded-br", "rounded-bl"],
        "rounded-l" => &["rounded-tl", "rounded-bl"],
        "rounded-s" => &["rounded-ss", "rounded-es"],
        "rounded-e" => &["rounded-se", "rounded-ee"],
        _ => &[],
    }
}
