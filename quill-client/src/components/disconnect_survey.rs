use quill::EventKind;
use quill_components::{SelectList, SelectListProps};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::{Paragraph, Wrap},
    Frame,
};

use super::Component;
use crate::action::Intent;
use crate::i18n::Translator;

/// A reason the user can give, and where choosing it leads
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurveyOption {
    pub label: &'static str,
    pub href: String,
}

pub fn confirm_href(site_slug: &str) -> String {
    format!("/settings/disconnect-site/confirm/{site_slug}")
}

/// Reasons offered for `site_slug`; "too expensive" only makes sense on a
/// paid plan
pub fn survey_options(site_slug: &str, is_paid_plan: bool) -> Vec<SurveyOption> {
    let reason = |slug: &str, label| SurveyOption {
        label,
        href: format!("/settings/disconnect-site/{slug}/{site_slug}"),
    };

    let mut options = vec![
        reason("too-difficult", "It was too hard to configure Jetpack"),
        reason("missing-feature", "This plan didn’t include what I needed"),
    ];
    if is_paid_plan {
        options.push(reason("too-expensive", "This plan is too expensive"));
    }
    options.push(SurveyOption {
        label: "Troubleshooting — I'll be reconnecting afterwards",
        href: format!("{}?reason=troubleshooting", confirm_href(site_slug)),
    });
    options
}

pub struct DisconnectSurvey {
    list: SelectList,
    selected: usize,
}

pub struct DisconnectSurveyProps<'a> {
    pub site_slug: &'a str,
    pub is_paid_plan: bool,
    pub translator: &'a Translator,
}

impl Default for DisconnectSurvey {
    fn default() -> Self {
        Self {
            list: SelectList::new(),
            selected: 0,
        }
    }
}

impl DisconnectSurvey {
    pub fn new() -> Self {
        Self::default()
    }

    fn rows(options: &[SurveyOption], t: &Translator) -> Vec<Line<'static>> {
        options
            .iter()
            .map(|option| Line::raw(format!("  {}", t.translate(option.label))))
            .collect()
    }
}

#[derive(Debug, Clone, Copy)]
enum Pick {
    Highlight(usize),
    Choose(usize),
}

impl Component<Intent> for DisconnectSurvey {
    type Props<'a> = DisconnectSurveyProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Intent> {
        let options = survey_options(props.site_slug, props.is_paid_plan);
        let rows = Self::rows(&options, props.translator);
        self.selected = self.selected.min(options.len().saturating_sub(1));

        let list_props = SelectListProps {
            rows: &rows,
            selected: Some(self.selected),
            is_focused: true,
            title: None,
            empty_text: "",
            on_select: Pick::Highlight,
            on_activate: Some(Pick::Choose),
        };
        let picks: Vec<Pick> = self.list.handle_event(event, list_props).into_iter().collect();

        let mut intents = Vec::new();
        for pick in picks {
            match pick {
                // Local highlight only, nothing to dispatch
                Pick::Highlight(index) => self.selected = index,
                Pick::Choose(index) => {
                    if let Some(option) = options.get(index) {
                        intents.push(Intent::Navigate(option.href.clone()));
                    }
                }
            }
        }
        intents
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let t = props.translator;
        let [header, body] =
            Layout::vertical([Constraint::Length(3), Constraint::Min(1)]).areas(area);

        let question = t.translate_with(
            "Would you mind sharing why you want to disconnect %(siteName)s from WordPress.com?",
            &[("siteName", props.site_slug)],
        );
        frame.render_widget(
            Paragraph::new(question)
                .style(Style::default().add_modifier(Modifier::BOLD))
                .wrap(Wrap { trim: true }),
            header,
        );

        let options = survey_options(props.site_slug, props.is_paid_plan);
        let rows = Self::rows(&options, t);
        self.selected = self.selected.min(options.len().saturating_sub(1));
        let list_props = SelectListProps {
            rows: &rows,
            selected: Some(self.selected),
            is_focused: true,
            title: Some(t.translate("Disconnect")),
            empty_text: "",
            on_select: Pick::Highlight,
            on_activate: Some(Pick::Choose),
        };
        self.list.render(frame, body, list_props);
    }
}
