use std::rc::Rc;

use web_sys::window;
use yew::prelude::*;

use crate::effects::install_all;
use crate::web::WebPage;

const MOUNT_ID: &str = "app";

#[derive(Clone, PartialEq)]
struct NavItem {
    href: &'static str,
    label: &'static str,
}

#[derive(Clone, PartialEq)]
struct SkillCategory {
    title: &'static str,
    icon: &'static str,
    tags: &'static [&'static str],
}

#[derive(Clone, PartialEq)]
struct Mission {
    period: &'static str,
    role: &'static str,
    unit: &'static str,
    summary: &'static str,
}

#[derive(Clone, PartialEq)]
struct Project {
    title: &'static str,
    description: &'static str,
    stack: &'static [&'static str],
    href: &'static str,
}

#[derive(Clone, PartialEq)]
struct Training {
    degree: &'static str,
    school: &'static str,
    period: &'static str,
}

#[derive(Clone, PartialEq)]
struct Contact {
    icon: &'static str,
    label: &'static str,
    value: &'static str,
    href: &'static str,
}

const NAV_ITEMS: &[NavItem] = &[
    NavItem { href: "#home", label: "Home" },
    NavItem { href: "#about", label: "About" },
    NavItem { href: "#skills", label: "Arsenal" },
    NavItem { href: "#experience", label: "Missions" },
    NavItem { href: "#projects", label: "Expeditions" },
    NavItem { href: "#education", label: "Training" },
    NavItem { href: "#contact", label: "Contact" },
];

const SKILLS: &[SkillCategory] = &[
    SkillCategory {
        title: "Analysis",
        icon: "📊",
        tags: &["SQL", "Python", "pandas", "Statistics", "A/B Testing"],
    },
    SkillCategory {
        title: "Visualization",
        icon: "🗺️",
        tags: &["Tableau", "Power BI", "matplotlib", "D3.js"],
    },
    SkillCategory {
        title: "Engineering",
        icon: "⚙️",
        tags: &["Rust", "dbt", "Airflow", "Spark", "Docker"],
    },
    SkillCategory {
        title: "Modeling",
        icon: "🧠",
        tags: &["scikit-learn", "Forecasting", "Regression", "Clustering"],
    },
];

const MISSIONS: &[Mission] = &[
    Mission {
        period: "2023 - Present",
        role: "Senior Data Analyst",
        unit: "Survey Corps Logistics",
        summary: "Built the supply forecasting pipeline that cut resupply shortfalls beyond the walls by a third.",
    },
    Mission {
        period: "2021 - 2023",
        role: "Data Analyst",
        unit: "Garrison Regiment",
        summary: "Instrumented wall patrol reports and shipped the dashboards the watch commanders use daily.",
    },
    Mission {
        period: "2019 - 2021",
        role: "Analytics Intern",
        unit: "Military Police Records Office",
        summary: "Cleaned a decade of district census records into a queryable warehouse.",
    },
];

const PROJECTS: &[Project] = &[
    Project {
        title: "Titan Movement Atlas",
        description: "Geospatial clustering of sighting reports to predict incursion corridors.",
        stack: &["Python", "PostGIS", "Kepler.gl"],
        href: "#contact",
    },
    Project {
        title: "Gear Gas Ledger",
        description: "Consumption tracking for omni-directional mobility gear across squads.",
        stack: &["Rust", "SQLite", "Tableau"],
        href: "#contact",
    },
    Project {
        title: "Expedition Survival Model",
        description: "Survival analysis over twenty expeditions to rank formation strategies.",
        stack: &["R", "lifelines", "Shiny"],
        href: "#contact",
    },
];

const TRAINING: &[Training] = &[
    Training {
        degree: "M.S. Data Science",
        school: "Trost District Academy",
        period: "2019 - 2021",
    },
    Training {
        degree: "B.S. Statistics",
        school: "Shiganshina College",
        period: "2015 - 2019",
    },
];

const CONTACTS: &[Contact] = &[
    Contact {
        icon: "✉️",
        label: "Email",
        value: "scout@titan-portfolio.dev",
        href: "mailto:scout@titan-portfolio.dev",
    },
    Contact {
        icon: "💼",
        label: "LinkedIn",
        value: "in/scout-analyst",
        href: "https://www.linkedin.com/",
    },
    Contact {
        icon: "🐙",
        label: "GitHub",
        value: "scout-analyst",
        href: "https://github.com/",
    },
];

#[function_component(Navbar)]
fn navbar() -> Html {
    html! {
        <nav id="navbar" class="navbar">
            <div class="nav-container">
                <a class="nav-logo" href="#home">{"⚔️ Scout Archives"}</a>
                <ul id="nav-menu" class="nav-menu">
                    { for NAV_ITEMS.iter().map(|item| html! {
                        <li><a class="nav-link" href={item.href}>{item.label}</a></li>
                    }) }
                </ul>
                <button
                    id="nav-toggle"
                    class="nav-toggle"
                    type="button"
                    aria-label="Toggle navigation"
                >
                    <span class="bar"></span>
                    <span class="bar"></span>
                    <span class="bar"></span>
                </button>
            </div>
        </nav>
    }
}

#[function_component(Hero)]
fn hero() -> Html {
    html! {
        <section id="home" class="hero">
            <div class="fog-layer fog-back"></div>
            <div class="fog-layer fog-mid"></div>
            <div class="fog-layer fog-front"></div>
            <div class="hero-content">
                <h1 class="hero-title">{"Dedicate Your Data"}</h1>
                <p class="hero-subtitle">{"Data analyst charting the world beyond the walls."}</p>
                <a class="hero-cta" href="#projects">{"View expeditions"}</a>
            </div>
        </section>
    }
}

#[derive(Properties, PartialEq)]
struct SectionProps {
    id: AttrValue,
    title: AttrValue,
    children: Children,
}

#[function_component(Section)]
fn section(props: &SectionProps) -> Html {
    html! {
        <section id={props.id.clone()} class="section">
            <h2 class="section-title">{props.title.clone()}</h2>
            { for props.children.iter() }
        </section>
    }
}

#[function_component(App)]
fn app() -> Html {
    use_effect_with((), |_| {
        let effects = match WebPage::new() {
            Ok(page) => Some(install_all(Rc::new(page))),
            Err(error) => {
                web_sys::console::warn_1(&format!("effects disabled: {error}").into());
                None
            }
        };
        move || drop(effects)
    });

    html! {
        <>
            <Navbar />
            <Hero />
            <main>
                <Section id="about" title="About">
                    <p class="about-text">
                        {"I turn raw field reports into decisions. Eight years of SQL, Python and \
                          dashboards, always in service of the next expedition."}
                    </p>
                </Section>

                <Section id="skills" title="Arsenal">
                    <div class="skills-grid">
                        { for SKILLS.iter().map(|category| html! {
                            <div class="skill-category">
                                <h3>{category.icon}{" "}{category.title}</h3>
                                <div class="skill-tags">
                                    { for category.tags.iter().map(|tag| html! {
                                        <span class="skill-tag">{*tag}</span>
                                    }) }
                                </div>
                            </div>
                        }) }
                    </div>
                </Section>

                <Section id="experience" title="Missions">
                    <div class="timeline">
                        { for MISSIONS.iter().map(|mission| html! {
                            <div class="timeline-item">
                                <span class="timeline-period">{mission.period}</span>
                                <h3>{mission.role}</h3>
                                <p class="muted">{mission.unit}</p>
                                <p>{mission.summary}</p>
                            </div>
                        }) }
                    </div>
                </Section>

                <Section id="projects" title="Expeditions">
                    <div class="projects-grid">
                        { for PROJECTS.iter().map(|project| html! {
                            <article class="project-card">
                                <h3>{project.title}</h3>
                                <p>{project.description}</p>
                                <ul class="project-stack">
                                    { for project.stack.iter().map(|tool| html! {
                                        <li>{*tool}</li>
                                    }) }
                                </ul>
                                <a class="project-link" href={project.href}>{"Request briefing"}</a>
                            </article>
                        }) }
                    </div>
                </Section>

                <Section id="education" title="Training">
                    <div class="education-grid">
                        { for TRAINING.iter().map(|training| html! {
                            <div class="education-card">
                                <h3>{training.degree}</h3>
                                <p>{training.school}</p>
                                <span class="muted">{training.period}</span>
                            </div>
                        }) }
                    </div>
                </Section>

                <Section id="contact" title="Contact">
                    <div class="contact-grid">
                        { for CONTACTS.iter().map(|contact| html! {
                            <a
                                class="contact-card"
                                href={contact.href}
                                target="_blank"
                                rel="noopener noreferrer"
                            >
                                <span class="contact-icon" aria-hidden="true">{contact.icon}</span>
                                <span class="contact-label">{contact.label}</span>
                                <span class="contact-value">{contact.value}</span>
                            </a>
                        }) }
                    </div>
                </Section>
            </main>
            <footer class="footer">
                <p>{"Those who see data clearly control the battlefield."}</p>
            </footer>
        </>
    }
}

pub fn run() {
    let Some(root) = window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(MOUNT_ID))
    else {
        web_sys::console::warn_1(&format!("missing #{MOUNT_ID} mount point").into());
        return;
    };

    yew::Renderer::<App>::with_root(root).render();
}
