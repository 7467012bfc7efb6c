//! Class-attribute helpers for HUD elements

/// CSS class marking an element as not displayed
pub const HIDDEN_CLASS: &str = "hidden";

/// `classes` with `class` present or absent; other classes keep their order
pub fn with_class(classes: &str, class: &str, present: bool) -> String {
    let mut out: Vec<&str> = classes.split_whitespace().filter(|c| *c != class).collect();
    if present {
        out.push(class);
    }
    out.join(" ")
}

/// Class list after showing or hiding an element
pub fn visibility_classes(classes: &str, visible: bool) -> String {
    with_class(classes, HIDDEN_CLASS, !visible)
}
