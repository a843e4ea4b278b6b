/// Guideline used when the user picks a framework the catalog does not know.
pub const GENERIC_GUIDELINE: &str =
    "Use the framework's conventional component structure and styling approach";

const FRAMEWORKS: [(&str, &str); 8] = [
    ("Flutter", "Create a Stateless or Stateful Widget for the screen"),
    ("React", "Create a functional component with hooks. Use CSS-in-JS for styling"),
    ("React Native", "Create a functional component with hooks. Use StyleSheet for styling"),
    ("SwiftUI", "Create a View struct. Use SwiftUI's declarative syntax"),
    (
        "HTML/CSS/JavaScript",
        "Create separate HTML, CSS, and JS files. Use modern CSS and flexbox features",
    ),
    ("Kotlin", "Create an Activity or Fragment for Android. Use Android Jetpack components"),
    ("Vue", "Create a Vue 3 component with Composition API. Use scoped styles"),
    ("Angular", "Create an Angular component with TypeScript. Use Angular's template syntax"),
];

/// Maps the framework labels offered by the sidebar form to the per-framework
/// guideline spliced into the system instruction.
pub struct FrameworkCatalog {
    entries: &'static [(&'static str, &'static str)],
}

impl FrameworkCatalog {
    pub const fn new(entries: &'static [(&'static str, &'static str)]) -> Self {
        Self { entries }
    }

    pub fn guideline(&self, label: &str) -> &'static str {
        self.entries
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(label))
            .map_or(GENERIC_GUIDELINE, |&(_, guideline)| guideline)
    }
}

impl Default for FrameworkCatalog {
    fn default() -> Self {
        Self::new(&FRAMEWORKS)
    }
}
