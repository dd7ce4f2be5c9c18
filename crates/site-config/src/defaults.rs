//! Default values for every section of the document.

use std::collections::BTreeMap;

use crate::schema::*;

/// Color keys every built-in preset defines.
pub const THEME_COLOR_KEYS: [&str; 11] = [
    "electric",
    "electricLight",
    "fire",
    "fireLight",
    "water",
    "waterLight",
    "alien",
    "alienLight",
    "alienAccent",
    "cyan",
    "darkBg",
];

fn theme(colors: [&str; 11]) -> Theme {
    THEME_COLOR_KEYS
        .iter()
        .zip(colors)
        .map(|(key, color)| (key.to_string(), color.to_string()))
        .collect()
}

fn preset(name: &str, colors: [&str; 11]) -> ThemePreset {
    ThemePreset {
        name: name.to_string(),
        theme: theme(colors),
    }
}

/// Theme of the `default` preset.
pub fn default_theme() -> Theme {
    theme([
        "#dd8448", "#ff9d66", "#ff4500", "#ffd700", "#00bfff", "#40e0d0", "#b14aed", "#00ff88",
        "#ff00ff", "#00f0ff", "#0a0a0f",
    ])
}

/// The three presets shipped with every document: `default`, `noir`, `aurora`.
pub fn builtin_theme_presets() -> BTreeMap<String, ThemePreset> {
    let mut presets = BTreeMap::new();
    presets.insert(
        DEFAULT_THEME_ID.to_string(),
        ThemePreset {
            name: "Default".to_string(),
            theme: default_theme(),
        },
    );
    presets.insert(
        "noir".to_string(),
        preset(
            "Noir",
            [
                "#b8b8b8", "#ffffff", "#ff2d55", "#ff5a7a", "#4da3ff", "#88c2ff", "#a855f7",
                "#c084fc", "#22d3ee", "#22d3ee", "#06060a",
            ],
        ),
    );
    presets.insert(
        "aurora".to_string(),
        preset(
            "Aurora",
            [
                "#22c55e", "#86efac", "#f97316", "#fdba74", "#06b6d4", "#67e8f9", "#8b5cf6",
                "#c4b5fd", "#f472b6", "#67e8f9", "#050b12",
            ],
        ),
    );
    presets
}

fn page(id: &str, title: &str, template: PageTemplate) -> Page {
    Page {
        id: id.to_string(),
        slug: id.to_string(),
        title: title.to_string(),
        template,
        blocks: Vec::new(),
    }
}

pub fn default_pages() -> Vec<Page> {
    vec![
        page(HOME_PAGE_ID, "Home", PageTemplate::Home),
        page("about", "About", PageTemplate::Blocks),
    ]
}

impl Default for Menu {
    fn default() -> Self {
        let page = |slug: &str, label: &str| MenuItem::Page {
            slug: slug.to_string(),
            label: label.to_string(),
        };
        let anchor = |href: &str, label: &str| MenuItem::Anchor {
            href: href.to_string(),
            label: label.to_string(),
        };
        Self {
            primary: vec![
                page("home", "Home"),
                anchor("#projects", "Projects"),
                page("about", "About"),
                anchor("#contact", "Contact"),
            ],
        }
    }
}

impl Default for Brand {
    fn default() -> Self {
        Self {
            logo_text: "CM".to_string(),
            site_title: "AI Dev Portfolio | Elemental Edition".to_string(),
        }
    }
}

impl Default for Hero {
    fn default() -> Self {
        Self {
            headline: String::new(),
            typing_text: "Building the future with code & intelligence".to_string(),
            description: "Specializing in React, TypeScript, and full-stack development with expertise in AI integration, microservices architecture, and cutting-edge web technologies.".to_string(),
            cta_text: "View Projects".to_string(),
            cta_href: "#projects".to_string(),
        }
    }
}

impl Default for Contact {
    fn default() -> Self {
        Self {
            title: "Ready to Build Something Extraordinary?".to_string(),
            subtitle: "Let's collaborate on your next AI-powered application".to_string(),
            email: "hello@example.com".to_string(),
            cta_text: "Get in Touch".to_string(),
        }
    }
}

impl Default for AboutCard {
    fn default() -> Self {
        let highlight = |label: &str, value: &str| Highlight {
            label: label.to_string(),
            value: value.to_string(),
        };
        Self {
            base: "electric".to_string(),
            title: "Product Systems Engineer".to_string(),
            meta: "Product-minded developer • Sci-fi UI systems".to_string(),
            body: "I build AI-first interfaces that feel intentional, fast, and trustworthy. Every component is an opportunity to balance aesthetics, accessibility, and maintainability.".to_string(),
            description: "Elegant UI, clean architecture, and small details that make products feel alive.".to_string(),
            tags: strings(&["Design Systems", "TypeScript", "UX", "Performance"]),
            highlights: vec![
                highlight("Tooling", "Custom CLI, schema guardrails, DX-focused workflows."),
                highlight("Systems", "Atomic design libraries, token pipelines, CMS integration."),
                highlight("Delivery", "Ship-ready prototypes, observability baked in, smooth handoffs."),
            ],
        }
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        let item = |label: &str, icon: &str, title: &str| Capability {
            label: label.to_string(),
            icon: icon.to_string(),
            title: title.to_string(),
        };
        Self {
            title: "Core Competencies".to_string(),
            subtitle: "Focused on the stacks and patterns that launch AI products faster.".to_string(),
            items: vec![
                item("React", "⚛️", "React"),
                item("TypeScript", "TS", "TypeScript"),
                item("Full-Stack", "🛠️", "Full-Stack"),
                item("AI / ML", "🤖", "AI/ML"),
                item("Microservices", "⛓️", "Microservices"),
                item("Real-Time", "⚡", "Real-time"),
                item("Data Viz", "📊", "Data Viz"),
                item("Design Systems", "🎨", "Design"),
                item("DevTools", "🧰", "DevTools"),
                item("Security", "🔐", "Security"),
            ],
        }
    }
}

impl Default for Footer {
    fn default() -> Self {
        Self {
            text: "© 2025 AI Development Portfolio. Built with ♥ and elemental power.".to_string(),
        }
    }
}

pub fn default_social() -> BTreeMap<String, String> {
    ["github", "linkedin", "twitter"]
        .into_iter()
        .map(|network| (network.to_string(), String::new()))
        .collect()
}

impl Default for HomeLayout {
    fn default() -> Self {
        let section = |id: &str| HomeSection {
            id: id.to_string(),
            enabled: true,
        };
        Self {
            sections: vec![
                section("hero"),
                section("capabilities"),
                section("projects"),
                section("contact"),
                section("footer"),
            ],
        }
    }
}

pub fn default_elements() -> Vec<String> {
    strings(&["electric", "fire", "water", "alien", "solar", "bio"])
}

pub fn default_projects() -> Vec<Project> {
    let project = |category: &str,
                   app_type: &str,
                   title: &str,
                   description: &str,
                   tags: &[&str],
                   base: &str| Project {
        category: category.to_string(),
        app_type: app_type.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        tags: strings(tags),
        base: base.to_string(),
        ..Project::default()
    };
    vec![
        project(
            "Enterprise",
            "Legal Software",
            "AI-Powered Legal Apps",
            "Enterprise legal practice management with microservices and AI-powered analysis.",
            &["React", "TypeScript", "AI"],
            "electric",
        ),
        project(
            "Scheduling",
            "Scheduling Software",
            "Pattern Engine",
            "AI-powered pattern recognition with enterprise permissions and real-time sync.",
            &["Full-Stack", "AI/ML", "Real-time"],
            "fire",
        ),
        project(
            "Design",
            "Design Tool",
            "Customizer",
            "25+ shapes with glassmorphic aesthetics, real-time preview, and code export.",
            &["React", "Canvas", "Design"],
            "water",
        ),
        project(
            "DevTools",
            "Audit Framework",
            "Validator",
            "Pre-production validation framework for security, functionality, and performance.",
            &["Node.js", "Security", "Testing"],
            "alien",
        ),
        project(
            "Legal Tech",
            "Research Platform",
            "Research Hub",
            "Real-time legal research with cross-jurisdictional analysis and AI recommendations.",
            &["Full-Stack", "React", "AI"],
            "electric",
        ),
        project(
            "Analytics",
            "Dashboard",
            "Analytics Hub",
            "Real-time data visualization with predictive analytics and sentiment analysis.",
            &["React", "D3.js", "Analytics"],
            "fire",
        ),
        project(
            "Energy",
            "Sustainability Platform",
            "Helios Grid",
            "Neon-bright solar operations console that balances energy markets with predictive insights.",
            &["Solar", "IoT", "Optimization"],
            "solar",
        ),
        project(
            "Biome",
            "Bioinformatics Suite",
            "Verdant Lab",
            "Living systems monitor that visualizes growth, genomes, and regenerative experiments.",
            &["BioTech", "ML", "Data Viz"],
            "bio",
        ),
    ]
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            brand: Brand::default(),
            pages: default_pages(),
            menu: Menu::default(),
            hero: Hero::default(),
            contact: Contact::default(),
            about_card: AboutCard::default(),
            capabilities: Capabilities::default(),
            footer: Footer::default(),
            social: default_social(),
            theme_presets: builtin_theme_presets(),
            active_theme_id: DEFAULT_THEME_ID.to_string(),
            media: Media::default(),
            media_library: Vec::new(),
            seo: Seo::default(),
            home_layout: HomeLayout::default(),
            elements: default_elements(),
            projects: default_projects(),
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}
