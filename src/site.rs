use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::db::DbPool;
use crate::models::settings::SiteSetting;

// ── Bundle types ───────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Link {
    pub label: String,
    pub url: String,
}

impl Link {
    fn new(label: &str, url: &str) -> Self {
        Link {
            label: label.to_string(),
            url: url.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HomeButtons {
    pub about: String,
    pub projects: String,
    pub certificates: String,
    pub contact: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HomeSection {
    pub hero_title: String,
    pub hero_description: String,
    pub terminal_commands: Vec<String>,
    pub buttons: HomeButtons,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FooterSection {
    pub brand_title: String,
    pub brand_description: String,
    pub quick_links: Vec<Link>,
    pub social_links: Vec<Link>,
    pub copyright_year: i32,
    pub copyright_name: String,
    pub copyright_text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NavigationSection {
    pub brand_text: String,
    pub links: Vec<Link>,
    pub show_theme_toggle: bool,
}

/// Contact page copy, localized per field (Russian / English pairs).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContactSection {
    pub title_ru: String,
    pub title_en: String,
    pub description_ru: String,
    pub description_en: String,
    pub info_title_ru: String,
    pub info_title_en: String,
    pub email_label_ru: String,
    pub email_label_en: String,
    pub email_value: String,
    pub telegram_label_ru: String,
    pub telegram_label_en: String,
    pub telegram_url: String,
    pub linkedin_label_ru: String,
    pub linkedin_label_en: String,
    pub linkedin_url: String,
    pub github_label_ru: String,
    pub github_label_en: String,
    pub github_url: String,
    pub form_name_label_ru: String,
    pub form_name_label_en: String,
    pub form_email_label_ru: String,
    pub form_email_label_en: String,
    pub form_message_label_ru: String,
    pub form_message_label_en: String,
    pub submit_label_ru: String,
    pub submit_label_en: String,
    pub success_message_ru: String,
    pub success_message_en: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeoPage {
    pub meta_title: String,
    pub meta_description: String,
    pub og_image: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeoSection {
    pub home: SeoPage,
    pub about: SeoPage,
    pub projects: SeoPage,
    pub certificates: SeoPage,
    pub contact: SeoPage,
    pub blog: SeoPage,
    pub blog_post: SeoPage,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SiteSettings {
    pub home: HomeSection,
    pub footer: FooterSection,
    pub navigation: NavigationSection,
    pub contact: ContactSection,
    pub seo: SeoSection,
}

// ── Defaults ───────────────────────────────────────────

fn seo_page(title: &str, description: &str, image: &str) -> SeoPage {
    SeoPage {
        meta_title: title.to_string(),
        meta_description: description.to_string(),
        og_image: image.to_string(),
    }
}

pub fn default_site_settings() -> SiteSettings {
    SiteSettings {
        home: HomeSection {
            hero_title: "Komron Juraev - System Administrator & Security Enthusiast".to_string(),
            hero_description: "Networking | Automation | Information Security".to_string(),
            terminal_commands: vec![
                "systemctl status network".to_string(),
                "cat /etc/hostname".to_string(),
                "ping -c 4 8.8.8.8".to_string(),
                "ls -la /opt".to_string(),
                "ps aux | grep nginx".to_string(),
                "whoami && pwd".to_string(),
            ],
            buttons: HomeButtons {
                about: "About Me".to_string(),
                projects: "View Projects".to_string(),
                certificates: "Certificates".to_string(),
                contact: "Contact".to_string(),
            },
        },
        footer: FooterSection {
            brand_title: "Digital SysAdmin".to_string(),
            brand_description: "System Administrator & Security Enthusiast".to_string(),
            quick_links: vec![
                Link::new("Home", "/"),
                Link::new("About", "/about"),
                Link::new("Projects", "/projects"),
                Link::new("Certificates", "/certificates"),
            ],
            social_links: vec![
                Link::new("Telegram", "https://t.me/komron"),
                Link::new("GitHub", "https://github.com/komron"),
                Link::new("LinkedIn", "https://linkedin.com/in/komron"),
            ],
            copyright_year: chrono::Utc::now().year(),
            copyright_name: "Komron Juraev".to_string(),
            copyright_text: "All rights reserved.".to_string(),
        },
        navigation: NavigationSection {
            brand_text: "$ cd ~/komron".to_string(),
            links: vec![
                Link::new("Home", "/"),
                Link::new("About", "/about"),
                Link::new("Projects", "/projects"),
                Link::new("Certificates", "/certificates"),
                Link::new("Contact", "/contact"),
                Link::new("Blog", "/blog"),
            ],
            show_theme_toggle: true,
        },
        contact: ContactSection {
            title_ru: "Свяжитесь со мной".to_string(),
            title_en: "Get In Touch".to_string(),
            description_ru: "Есть вопрос или предложение по сотрудничеству? Напишите мне.".to_string(),
            description_en: "Have a question or want to work together? Let's connect!".to_string(),
            info_title_ru: "Контактная информация".to_string(),
            info_title_en: "Contact Information".to_string(),
            email_label_ru: "Почта".to_string(),
            email_label_en: "Email".to_string(),
            email_value: "komron@example.com".to_string(),
            telegram_label_ru: "Telegram".to_string(),
            telegram_label_en: "Telegram".to_string(),
            telegram_url: "https://t.me/komron".to_string(),
            linkedin_label_ru: "LinkedIn".to_string(),
            linkedin_label_en: "LinkedIn".to_string(),
            linkedin_url: "https://linkedin.com/in/komron".to_string(),
            github_label_ru: "GitHub".to_string(),
            github_label_en: "GitHub".to_string(),
            github_url: "https://github.com/komron".to_string(),
            form_name_label_ru: "Имя".to_string(),
            form_name_label_en: "Name".to_string(),
            form_email_label_ru: "Почта".to_string(),
            form_email_label_en: "Email".to_string(),
            form_message_label_ru: "Сообщение".to_string(),
            form_message_label_en: "Message".to_string(),
            submit_label_ru: "Отправить сообщение".to_string(),
            submit_label_en: "Send Message".to_string(),
            success_message_ru: "Сообщение успешно отправлено! Я скоро отвечу.".to_string(),
            success_message_en: "Message sent successfully! I'll get back to you soon.".to_string(),
        },
        seo: SeoSection {
            home: seo_page(
                "Digital SysAdmin - Komron Juraev",
                "Portfolio of Komron Juraev - System Administrator, Network Specialist, Security Enthusiast",
                "/images/default-project.svg",
            ),
            about: seo_page(
                "About - Komron Juraev",
                "About Komron Juraev, system administrator and security enthusiast.",
                "/images/default-avatar.svg",
            ),
            projects: seo_page(
                "Projects - Komron Juraev",
                "Selected projects in networking, automation, and security.",
                "/images/default-project.svg",
            ),
            certificates: seo_page(
                "Certificates - Komron Juraev",
                "Professional certificates and completed training.",
                "/images/default-project.svg",
            ),
            contact: seo_page(
                "Contact - Komron Juraev",
                "Get in touch with Komron Juraev.",
                "/images/default-project.svg",
            ),
            blog: seo_page(
                "Blog - Komron Juraev",
                "Blog posts on networking, automation, and information security.",
                "/images/default-project.svg",
            ),
            blog_post: seo_page(
                "Blog Post - Komron Juraev",
                "Read this blog post.",
                "/images/default-project.svg",
            ),
        },
    }
}

// ── Stored overrides ───────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ButtonsOverrides {
    pub about: Option<String>,
    pub projects: Option<String>,
    pub certificates: Option<String>,
    pub contact: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct HomeOverrides {
    pub hero_title: Option<String>,
    pub hero_description: Option<String>,
    pub terminal_commands: Option<Vec<String>>,
    pub buttons: Option<ButtonsOverrides>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FooterOverrides {
    pub brand_title: Option<String>,
    pub brand_description: Option<String>,
    pub quick_links: Option<Vec<Link>>,
    pub social_links: Option<Vec<Link>>,
    pub copyright_year: Option<i32>,
    pub copyright_name: Option<String>,
    pub copyright_text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct NavigationOverrides {
    pub brand_text: Option<String>,
    pub links: Option<Vec<Link>>,
    pub show_theme_toggle: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ContactOverrides {
    pub title_ru: Option<String>,
    pub title_en: Option<String>,
    pub description_ru: Option<String>,
    pub description_en: Option<String>,
    pub info_title_ru: Option<String>,
    pub info_title_en: Option<String>,
    pub email_label_ru: Option<String>,
    pub email_label_en: Option<String>,
    pub email_value: Option<String>,
    pub telegram_label_ru: Option<String>,
    pub telegram_label_en: Option<String>,
    pub telegram_url: Option<String>,
    pub linkedin_label_ru: Option<String>,
    pub linkedin_label_en: Option<String>,
    pub linkedin_url: Option<String>,
    pub github_label_ru: Option<String>,
    pub github_label_en: Option<String>,
    pub github_url: Option<String>,
    pub form_name_label_ru: Option<String>,
    pub form_name_label_en: Option<String>,
    pub form_email_label_ru: Option<String>,
    pub form_email_label_en: Option<String>,
    pub form_message_label_ru: Option<String>,
    pub form_message_label_en: Option<String>,
    pub submit_label_ru: Option<String>,
    pub submit_label_en: Option<String>,
    pub success_message_ru: Option<String>,
    pub success_message_en: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SeoPageOverrides {
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub og_image: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SeoOverrides {
    pub home: Option<SeoPageOverrides>,
    pub about: Option<SeoPageOverrides>,
    pub projects: Option<SeoPageOverrides>,
    pub certificates: Option<SeoPageOverrides>,
    pub contact: Option<SeoPageOverrides>,
    pub blog: Option<SeoPageOverrides>,
    pub blog_post: Option<SeoPageOverrides>,
}

#[derive(Debug, Default)]
pub struct SiteSettingsOverrides {
    pub home: HomeOverrides,
    pub footer: FooterOverrides,
    pub navigation: NavigationOverrides,
    pub contact: ContactOverrides,
    pub seo: SeoOverrides,
}

// ── Merge ──────────────────────────────────────────────

/// Non-empty incoming value wins, else the default is kept.
fn pick(incoming: Option<String>, default: String) -> String {
    match incoming {
        Some(v) if !v.trim().is_empty() => v,
        _ => default,
    }
}

/// Arrays are replaced wholesale only when the incoming list is non-empty.
fn pick_list<T>(incoming: Option<Vec<T>>, default: Vec<T>) -> Vec<T> {
    match incoming {
        Some(v) if !v.is_empty() => v,
        _ => default,
    }
}

fn merge_seo_page(incoming: Option<SeoPageOverrides>, default: SeoPage) -> SeoPage {
    let inc = incoming.unwrap_or_default();
    SeoPage {
        meta_title: pick(inc.meta_title, default.meta_title),
        meta_description: pick(inc.meta_description, default.meta_description),
        og_image: pick(inc.og_image, default.og_image),
    }
}

/// Pure merge of persisted overrides onto the defaults constant.
pub fn merge_site_settings(
    defaults: SiteSettings,
    overrides: SiteSettingsOverrides,
) -> SiteSettings {
    let d = defaults;
    let o = overrides;

    let buttons_inc = o.home.buttons.unwrap_or_default();

    SiteSettings {
        home: HomeSection {
            hero_title: pick(o.home.hero_title, d.home.hero_title),
            hero_description: pick(o.home.hero_description, d.home.hero_description),
            terminal_commands: pick_list(o.home.terminal_commands, d.home.terminal_commands),
            buttons: HomeButtons {
                about: pick(buttons_inc.about, d.home.buttons.about),
                projects: pick(buttons_inc.projects, d.home.buttons.projects),
                certificates: pick(buttons_inc.certificates, d.home.buttons.certificates),
                contact: pick(buttons_inc.contact, d.home.buttons.contact),
            },
        },
        footer: FooterSection {
            brand_title: pick(o.footer.brand_title, d.footer.brand_title),
            brand_description: pick(o.footer.brand_description, d.footer.brand_description),
            quick_links: pick_list(o.footer.quick_links, d.footer.quick_links),
            social_links: pick_list(o.footer.social_links, d.footer.social_links),
            copyright_year: o.footer.copyright_year.unwrap_or(d.footer.copyright_year),
            copyright_name: pick(o.footer.copyright_name, d.footer.copyright_name),
            copyright_text: pick(o.footer.copyright_text, d.footer.copyright_text),
        },
        navigation: NavigationSection {
            brand_text: pick(o.navigation.brand_text, d.navigation.brand_text),
            links: pick_list(o.navigation.links, d.navigation.links),
            show_theme_toggle: o
                .navigation
                .show_theme_toggle
                .unwrap_or(d.navigation.show_theme_toggle),
        },
        contact: ContactSection {
            title_ru: pick(o.contact.title_ru, d.contact.title_ru),
            title_en: pick(o.contact.title_en, d.contact.title_en),
            description_ru: pick(o.contact.description_ru, d.contact.description_ru),
            description_en: pick(o.contact.description_en, d.contact.description_en),
            info_title_ru: pick(o.contact.info_title_ru, d.contact.info_title_ru),
            info_title_en: pick(o.contact.info_title_en, d.contact.info_title_en),
            email_label_ru: pick(o.contact.email_label_ru, d.contact.email_label_ru),
            email_label_en: pick(o.contact.email_label_en, d.contact.email_label_en),
            email_value: pick(o.contact.email_value, d.contact.email_value),
            telegram_label_ru: pick(o.contact.telegram_label_ru, d.contact.telegram_label_ru),
            telegram_label_en: pick(o.contact.telegram_label_en, d.contact.telegram_label_en),
            telegram_url: pick(o.contact.telegram_url, d.contact.telegram_url),
            linkedin_label_ru: pick(o.contact.linkedin_label_ru, d.contact.linkedin_label_ru),
            linkedin_label_en: pick(o.contact.linkedin_label_en, d.contact.linkedin_label_en),
            linkedin_url: pick(o.contact.linkedin_url, d.contact.linkedin_url),
            github_label_ru: pick(o.contact.github_label_ru, d.contact.github_label_ru),
            github_label_en: pick(o.contact.github_label_en, d.contact.github_label_en),
            github_url: pick(o.contact.github_url, d.contact.github_url),
            form_name_label_ru: pick(o.contact.form_name_label_ru, d.contact.form_name_label_ru),
            form_name_label_en: pick(o.contact.form_name_label_en, d.contact.form_name_label_en),
            form_email_label_ru: pick(o.contact.form_email_label_ru, d.contact.form_email_label_ru),
            form_email_label_en: pick(o.contact.form_email_label_en, d.contact.form_email_label_en),
            form_message_label_ru: pick(
                o.contact.form_message_label_ru,
                d.contact.form_message_label_ru,
            ),
            form_message_label_en: pick(
                o.contact.form_message_label_en,
                d.contact.form_message_label_en,
            ),
            submit_label_ru: pick(o.contact.submit_label_ru, d.contact.submit_label_ru),
            submit_label_en: pick(o.contact.submit_label_en, d.contact.submit_label_en),
            success_message_ru: pick(o.contact.success_message_ru, d.contact.success_message_ru),
            success_message_en: pick(o.contact.success_message_en, d.contact.success_message_en),
        },
        seo: SeoSection {
            home: merge_seo_page(o.seo.home, d.seo.home),
            about: merge_seo_page(o.seo.about, d.seo.about),
            projects: merge_seo_page(o.seo.projects, d.seo.projects),
            certificates: merge_seo_page(o.seo.certificates, d.seo.certificates),
            contact: merge_seo_page(o.seo.contact, d.seo.contact),
            blog: merge_seo_page(o.seo.blog, d.seo.blog),
            blog_post: merge_seo_page(o.seo.blog_post, d.seo.blog_post),
        },
    }
}

/// Parse one stored section value, falling back to empty overrides on
/// missing row or malformed JSON.
fn parse_section<T: Default + serde::de::DeserializeOwned>(raw: Option<String>) -> T {
    raw.and_then(|v| serde_json::from_str(&v).ok())
        .unwrap_or_default()
}

/// Read all sections and merge them onto the defaults. Settings are
/// best-effort: if the store is unreachable the defaults are returned
/// so page rendering never fails on this path.
pub fn get_site_settings(pool: &DbPool) -> SiteSettings {
    if pool.get().is_err() {
        log::warn!("Settings store unavailable, serving defaults");
        return default_site_settings();
    }

    let overrides = SiteSettingsOverrides {
        home: parse_section(SiteSetting::get(pool, "home")),
        footer: parse_section(SiteSetting::get(pool, "footer")),
        navigation: parse_section(SiteSetting::get(pool, "navigation")),
        contact: parse_section(SiteSetting::get(pool, "contact")),
        seo: parse_section(SiteSetting::get(pool, "seo")),
    };

    merge_site_settings(default_site_settings(), overrides)
}

pub fn set_site_setting<T: Serialize>(pool: &DbPool, key: &str, payload: &T) -> Result<(), String> {
    let value = serde_json::to_string(payload).map_err(|e| e.to_string())?;
    SiteSetting::set(pool, key, &value)
}

// ── Form payload builders ──────────────────────────────

/// Trimmed form value; empty-after-trim means "keep the previous value".
fn field(form: &HashMap<String, String>, key: &str, current: &str) -> String {
    match form.get(key).map(|v| v.trim()) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => current.to_string(),
    }
}

/// Line-delimited free text to a list of trimmed non-empty lines.
/// An empty result keeps the previous list.
pub fn parse_command_lines(raw: &str, fallback: &[String]) -> Vec<String> {
    let commands: Vec<String> = raw
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect();
    if commands.is_empty() {
        fallback.to_vec()
    } else {
        commands
    }
}

/// `label|url` lines to Link pairs. The first pipe splits label from url,
/// so urls may themselves contain pipes. Lines missing either part are
/// dropped; an empty result keeps the previous list.
pub fn parse_link_lines(raw: &str, fallback: &[Link]) -> Vec<Link> {
    let links: Vec<Link> = raw
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .filter_map(|line| {
            let (label, url) = line.split_once('|')?;
            let label = label.trim();
            let url = url.trim();
            if label.is_empty() || url.is_empty() {
                return None;
            }
            Some(Link::new(label, url))
        })
        .collect();
    if links.is_empty() {
        fallback.to_vec()
    } else {
        links
    }
}

pub fn build_home_payload(form: &HashMap<String, String>, current: &HomeSection) -> HomeSection {
    HomeSection {
        hero_title: field(form, "hero_title", &current.hero_title),
        hero_description: field(form, "hero_description", &current.hero_description),
        terminal_commands: parse_command_lines(
            form.get("terminal_commands").map(String::as_str).unwrap_or(""),
            &current.terminal_commands,
        ),
        buttons: HomeButtons {
            about: field(form, "button_about", &current.buttons.about),
            projects: field(form, "button_projects", &current.buttons.projects),
            certificates: field(form, "button_certificates", &current.buttons.certificates),
            contact: field(form, "button_contact", &current.buttons.contact),
        },
    }
}

pub fn build_footer_payload(
    form: &HashMap<String, String>,
    current: &FooterSection,
) -> FooterSection {
    // Copyright year only accepted as an integer in (1990, 2101)
    let year = form
        .get("copyright_year")
        .and_then(|v| v.trim().parse::<i32>().ok())
        .filter(|y| *y > 1990 && *y < 2101)
        .unwrap_or(current.copyright_year);

    FooterSection {
        brand_title: field(form, "brand_title", &current.brand_title),
        brand_description: field(form, "brand_description", &current.brand_description),
        quick_links: parse_link_lines(
            form.get("quick_links").map(String::as_str).unwrap_or(""),
            &current.quick_links,
        ),
        social_links: parse_link_lines(
            form.get("social_links").map(String::as_str).unwrap_or(""),
            &current.social_links,
        ),
        copyright_year: year,
        copyright_name: field(form, "copyright_name", &current.copyright_name),
        copyright_text: field(form, "copyright_text", &current.copyright_text),
    }
}

pub fn build_navigation_payload(
    form: &HashMap<String, String>,
    current: &NavigationSection,
) -> NavigationSection {
    NavigationSection {
        brand_text: field(form, "brand_text", &current.brand_text),
        links: parse_link_lines(
            form.get("links").map(String::as_str).unwrap_or(""),
            &current.links,
        ),
        show_theme_toggle: form.get("show_theme_toggle").map(String::as_str) == Some("on"),
    }
}

pub fn build_contact_payload(
    form: &HashMap<String, String>,
    current: &ContactSection,
) -> ContactSection {
    ContactSection {
        title_ru: field(form, "title_ru", &current.title_ru),
        title_en: field(form, "title_en", &current.title_en),
        description_ru: field(form, "description_ru", &current.description_ru),
        description_en: field(form, "description_en", &current.description_en),
        info_title_ru: field(form, "info_title_ru", &current.info_title_ru),
        info_title_en: field(form, "info_title_en", &current.info_title_en),
        email_label_ru: field(form, "email_label_ru", &current.email_label_ru),
        email_label_en: field(form, "email_label_en", &current.email_label_en),
        email_value: field(form, "email_value", &current.email_value),
        telegram_label_ru: field(form, "telegram_label_ru", &current.telegram_label_ru),
        telegram_label_en: field(form, "telegram_label_en", &current.telegram_label_en),
        telegram_url: field(form, "telegram_url", &current.telegram_url),
        linkedin_label_ru: field(form, "linkedin_label_ru", &current.linkedin_label_ru),
        linkedin_label_en: field(form, "linkedin_label_en", &current.linkedin_label_en),
        linkedin_url: field(form, "linkedin_url", &current.linkedin_url),
        github_label_ru: field(form, "github_label_ru", &current.github_label_ru),
        github_label_en: field(form, "github_label_en", &current.github_label_en),
        github_url: field(form, "github_url", &current.github_url),
        form_name_label_ru: field(form, "form_name_label_ru", &current.form_name_label_ru),
        form_name_label_en: field(form, "form_name_label_en", &current.form_name_label_en),
        form_email_label_ru: field(form, "form_email_label_ru", &current.form_email_label_ru),
        form_email_label_en: field(form, "form_email_label_en", &current.form_email_label_en),
        form_message_label_ru: field(form, "form_message_label_ru", &current.form_message_label_ru),
        form_message_label_en: field(form, "form_message_label_en", &current.form_message_label_en),
        submit_label_ru: field(form, "submit_label_ru", &current.submit_label_ru),
        submit_label_en: field(form, "submit_label_en", &current.submit_label_en),
        success_message_ru: field(form, "success_message_ru", &current.success_message_ru),
        success_message_en: field(form, "success_message_en", &current.success_message_en),
    }
}

fn build_seo_page(form: &HashMap<String, String>, prefix: &str, current: &SeoPage) -> SeoPage {
    SeoPage {
        meta_title: field(form, &format!("{}_meta_title", prefix), &current.meta_title),
        meta_description: field(
            form,
            &format!("{}_meta_description", prefix),
            &current.meta_description,
        ),
        og_image: field(form, &format!("{}_og_image", prefix), &current.og_image),
    }
}

pub fn build_seo_payload(form: &HashMap<String, String>, current: &SeoSection) -> SeoSection {
    SeoSection {
        home: build_seo_page(form, "home", &current.home),
        about: build_seo_page(form, "about", &current.about),
        projects: build_seo_page(form, "projects", &current.projects),
        certificates: build_seo_page(form, "certificates", &current.certificates),
        contact: build_seo_page(form, "contact", &current.contact),
        blog: build_seo_page(form, "blog", &current.blog),
        blog_post: build_seo_page(form, "blog_post", &current.blog_post),
    }
}
