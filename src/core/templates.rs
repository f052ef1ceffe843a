//! Card templates for the site's data-driven sections.
//!
//! Each template decodes its item into a record type, so a data file that
//! drifts from the expected shape fails loudly instead of rendering blanks.
//! Every interpolated value is escaped, attribute values included.

use crate::core::{SectionItem, Template};
use crate::utils::error::{RenderError, Result};
use crate::utils::escape::escape_html;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Reveal delay added per item position.
pub const STAGGER_MS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateKind {
    Event,
    Shop,
    Service,
    Pricing,
    Team,
    Testimonial,
}

impl TemplateKind {
    pub const ALL: [TemplateKind; 6] = [
        TemplateKind::Event,
        TemplateKind::Shop,
        TemplateKind::Service,
        TemplateKind::Pricing,
        TemplateKind::Team,
        TemplateKind::Testimonial,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TemplateKind::Event => "event",
            TemplateKind::Shop => "shop",
            TemplateKind::Service => "service",
            TemplateKind::Pricing => "pricing",
            TemplateKind::Team => "team",
            TemplateKind::Testimonial => "testimonial",
        }
    }

    pub fn default_subject(self) -> &'static str {
        match self {
            TemplateKind::Event => "events",
            TemplateKind::Shop => "shop items",
            TemplateKind::Service => "services",
            TemplateKind::Pricing => "pricing",
            TemplateKind::Team => "team",
            TemplateKind::Testimonial => "testimonials",
        }
    }

    pub fn template(self) -> Template {
        match self {
            TemplateKind::Event => typed(event_card),
            TemplateKind::Shop => typed(shop_card),
            TemplateKind::Service => typed(service_card),
            TemplateKind::Pricing => typed(pricing_card),
            TemplateKind::Team => typed(team_card),
            TemplateKind::Testimonial => typed(testimonial_card),
        }
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TemplateKind {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self> {
        TemplateKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| RenderError::InvalidConfigValueError {
                field: "template".to_string(),
                value: s.to_string(),
                reason: format!(
                    "Unknown template. Valid templates: {}",
                    TemplateKind::ALL.map(TemplateKind::as_str).join(", ")
                ),
            })
    }
}

fn typed<T: DeserializeOwned + 'static>(render: fn(&T, usize) -> String) -> Template {
    Arc::new(move |item: &SectionItem, index: usize| -> Result<String> {
        let record: T = item.decode().map_err(|e| RenderError::TemplateError {
            index,
            message: e.to_string(),
        })?;
        Ok(render(&record, index))
    })
}

// Accepts strings, numbers and booleans; null and absence become None.
fn lenient_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

fn opening(index: usize) -> String {
    format!(
        "<article class=\"card\" data-aos=\"fade-up\" data-aos-delay=\"{}\">",
        index * STAGGER_MS
    )
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventCard {
    pub title: String,
    pub date: String,
    pub img: String,
    pub link: String,
}

pub fn event_card(ev: &EventCard, index: usize) -> String {
    let title = escape_html(&ev.title);
    let date = escape_html(&ev.date);
    format!(
        "{open}<img src=\"{img}\" alt=\"{title}\" loading=\"lazy\">\
         <div class=\"card-body\"><h3>{title}</h3>\
         <p class=\"muted\"><time datetime=\"{date}\">{date}</time></p>\
         <div class=\"meta\"><a class=\"btn small\" href=\"{link}\">Learn more</a></div>\
         </div></article>",
        open = opening(index),
        img = escape_html(&ev.img),
        link = escape_html(&ev.link),
    )
}

#[derive(Debug, Clone, Deserialize)]
pub struct ShopItem {
    pub title: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub price: Option<String>,
    pub img: String,
    pub link: String,
}

pub fn shop_card(it: &ShopItem, index: usize) -> String {
    let title = escape_html(&it.title);
    format!(
        "{open}<img src=\"{img}\" alt=\"{title}\" loading=\"lazy\">\
         <div class=\"card-body\"><h3>{title}</h3>\
         <p class=\"muted\"><strong>{price}</strong></p>\
         <div class=\"meta\"><a class=\"btn small\" href=\"{link}\">Inquire</a></div>\
         </div></article>",
        open = opening(index),
        img = escape_html(&it.img),
        price = escape_html(it.price.as_deref().unwrap_or("")),
        link = escape_html(&it.link),
    )
}

#[derive(Debug, Clone, Deserialize)]
pub struct Service {
    pub title: String,
    pub img: String,
    #[serde(default)]
    pub description: Option<String>,
}

pub fn service_card(s: &Service, index: usize) -> String {
    let title = escape_html(&s.title);
    format!(
        "{open}<img src=\"{img}\" alt=\"{title}\" loading=\"lazy\">\
         <div class=\"card-body\"><h3>{title}</h3>\
         <p class=\"muted\">{description}</p>\
         </div></article>",
        open = opening(index),
        img = escape_html(&s.img),
        description = escape_html(s.description.as_deref().unwrap_or("")),
    )
}

#[derive(Debug, Clone, Deserialize)]
pub struct PricingPlan {
    pub plan: String,
    pub title: String,
    #[serde(default)]
    pub features: Vec<String>,
    pub link: String,
}

pub fn pricing_card(p: &PricingPlan, index: usize) -> String {
    let features: String = p
        .features
        .iter()
        .map(|f| format!("<li>{}</li>", escape_html(f)))
        .collect();
    format!(
        "{open}<div class=\"card-body\"><h3>{plan}</h3><h4>{title}</h4>\
         <ul>{features}</ul>\
         <div class=\"meta\"><a class=\"btn small\" href=\"{link}\">Book now</a></div>\
         </div></article>",
        open = opening(index),
        plan = escape_html(&p.plan),
        title = escape_html(&p.title),
        link = escape_html(&p.link),
    )
}

#[derive(Debug, Clone, Deserialize)]
pub struct TeamMember {
    pub name: String,
    pub role: String,
    pub img: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
}

pub fn team_card(m: &TeamMember, index: usize) -> String {
    let name = escape_html(&m.name);
    let slug = m
        .slug
        .as_deref()
        .map(|s| format!(" data-slug=\"{}\"", escape_html(s)))
        .unwrap_or_default();
    format!(
        "<article class=\"card team-card\"{slug} data-aos=\"fade-up\" data-aos-delay=\"{delay}\">\
         <img src=\"{img}\" alt=\"{name}\" loading=\"lazy\">\
         <div class=\"card-body\"><h3>{name}</h3>\
         <p class=\"muted\">{role}</p><p class=\"muted\">{bio}</p>\
         </div></article>",
        delay = index * STAGGER_MS,
        img = escape_html(&m.img),
        role = escape_html(&m.role),
        bio = escape_html(m.bio.as_deref().unwrap_or("")),
    )
}

#[derive(Debug, Clone, Deserialize)]
pub struct Testimonial {
    pub text: String,
    pub name: String,
}

pub fn testimonial_card(t: &Testimonial, index: usize) -> String {
    format!(
        "{open}<div class=\"card-body\"><p>{text}</p>\
         <h4 class=\"accent\">{name}</h4>\
         </div></article>",
        open = opening(index),
        text = escape_html(&t.text),
        name = escape_html(&t.name),
    )
}
