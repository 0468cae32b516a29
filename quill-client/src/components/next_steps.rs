//! "Next steps" page offered after sign-up and from the account pages

use crossterm::event::KeyCode;
use quill::EventKind;
use quill_components::{SelectList, SelectListProps};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

use super::Component;
use crate::action::Intent;
use crate::i18n::Translator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Chat,
    Posts,
    CustomizeSite,
    ActivityLog,
    Profile,
}

const DEFAULT_SEQUENCE: &[Step] = &[
    Step::Posts,
    Step::CustomizeSite,
    Step::ActivityLog,
    Step::Profile,
];

const HAS_PLAN_SEQUENCE: &[Step] = &[
    Step::Chat,
    Step::Posts,
    Step::CustomizeSite,
    Step::Profile,
];

/// Steps in the order they are offered; plan holders get live chat first
pub fn sequence(has_plan: bool) -> &'static [Step] {
    if has_plan {
        HAS_PLAN_SEQUENCE
    } else {
        DEFAULT_SEQUENCE
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepDefinition {
    pub title: &'static str,
    pub description: &'static str,
    pub href: String,
}

/// What a step says and links to, for the user's newest site
pub fn definition(step: Step, newest_site_slug: Option<&str>) -> StepDefinition {
    let slug = newest_site_slug.unwrap_or_default();
    let (title, description, href) = match step {
        Step::Chat => (
            "Talk to a Happiness Engineer",
            "Your plan includes live chat with our support team.",
            "/me/chat".to_string(),
        ),
        Step::Posts => (
            "Write your first post",
            "Share your ideas with the world.",
            format!("/post/{slug}"),
        ),
        Step::CustomizeSite => (
            "Customize your site",
            "Give your site a name, a tagline and a look of its own.",
            format!("/settings/general/{slug}"),
        ),
        Step::ActivityLog => (
            "Follow what happens on your site",
            "Every change is recorded so you can roll it back.",
            format!("/activity-log/{slug}"),
        ),
        Step::Profile => (
            "Complete your profile",
            "Tell people who is behind the site.",
            "/me".to_string(),
        ),
    };
    StepDefinition {
        title,
        description,
        href,
    }
}

/// Where "skip these steps" leads
pub fn dismiss_href(newest_site_slug: Option<&str>) -> String {
    format!("/stats/insights/{}", newest_site_slug.unwrap_or_default())
}

pub struct NextSteps {
    list: SelectList,
    selected: usize,
}

pub struct NextStepsProps<'a> {
    /// Shown right after sign-up: intro and skip link on, account menu off
    pub is_welcome: bool,
    pub has_plan: bool,
    pub newest_site_slug: Option<&'a str>,
    pub translator: &'a Translator,
}

impl Default for NextSteps {
    fn default() -> Self {
        Self {
            list: SelectList::new(),
            selected: 0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Pick {
    Highlight(usize),
    Open(usize),
}

impl NextSteps {
    pub fn new() -> Self {
        Self::default()
    }

    fn rows(props: &NextStepsProps<'_>) -> Vec<Line<'static>> {
        let t = props.translator;
        sequence(props.has_plan)
            .iter()
            .enumerate()
            .map(|(index, step)| {
                let step = definition(*step, props.newest_site_slug);
                let title_style = if index == 0 {
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().add_modifier(Modifier::BOLD)
                };
                Line::from(vec![
                    Span::styled(format!("{}  ", t.translate(step.title)), title_style),
                    Span::styled(
                        t.translate(step.description).to_string(),
                        Style::default().fg(Color::Gray),
                    ),
                ])
            })
            .collect()
    }
}

impl Component<Intent> for NextSteps {
    type Props<'a> = NextStepsProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Intent> {
        if let EventKind::Key(key) = event {
            if props.is_welcome && key.code == KeyCode::Char('s') {
                return vec![Intent::Navigate(dismiss_href(props.newest_site_slug))];
            }
        }

        let steps = sequence(props.has_plan);
        let rows = Self::rows(&props);
        self.selected = self.selected.min(steps.len().saturating_sub(1));
        let list_props = SelectListProps {
            rows: &rows,
            selected: Some(self.selected),
            is_focused: true,
            title: None,
            empty_text: "",
            on_select: Pick::Highlight,
            on_activate: Some(Pick::Open),
        };
        let picks: Vec<Pick> = self.list.handle_event(event, list_props).into_iter().collect();

        let mut intents = Vec::new();
        for pick in picks {
            match pick {
                Pick::Highlight(index) => self.selected = index,
                Pick::Open(index) => {
                    if let Some(step) = steps.get(index) {
                        let href = definition(*step, props.newest_site_slug).href;
                        intents.push(Intent::Navigate(href));
                    }
                }
            }
        }
        intents
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let t = props.translator;
        let intro_height = if props.is_welcome { 4 } else { 0 };
        let outro_height = if props.is_welcome { 2 } else { 0 };
        let [intro, steps, outro] = Layout::vertical([
            Constraint::Length(intro_height),
            Constraint::Min(3),
            Constraint::Length(outro_height),
        ])
        .areas(area);

        if props.is_welcome {
            let text = vec![
                Line::styled(
                    t.translate("Thanks for signing up for WordPress.com."),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Line::raw(t.translate(
                    "Next you can take any of the following steps, join a guided blogging \
                     course, or check out our support documentation.",
                )),
            ];
            frame.render_widget(Paragraph::new(text).wrap(Wrap { trim: true }), intro);
        }

        let rows = Self::rows(&props);
        self.selected = self.selected.min(rows.len().saturating_sub(1));
        let title = if props.is_welcome {
            None
        } else {
            Some(t.translate("Next Steps"))
        };
        let list_props = SelectListProps {
            rows: &rows,
            selected: Some(self.selected),
            is_focused: true,
            title,
            empty_text: "",
            on_select: Pick::Highlight,
            on_activate: Some(Pick::Open),
        };
        self.list.render(frame, steps, list_props);

        if props.is_welcome {
            let skip = t.translate_with(
                "If you want you can skip these steps (s, %(href)s). You can come back to this \
                 page any time.",
                &[("href", &dismiss_href(props.newest_site_slug))],
            );
            frame.render_widget(
                Paragraph::new(skip)
                    .style(Style::default().fg(Color::DarkGray))
                    .wrap(Wrap { trim: true }),
                outro,
            );
        }
    }
}
