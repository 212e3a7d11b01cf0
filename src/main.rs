// src/main.rs
use iced::alignment::Horizontal;
use iced::widget::{button, column, container, row, scrollable, text, Column, Row, Space};
use iced::{
    executor, window, Alignment, Application, Background, Color, Command, Element, Length,
    Settings, Theme,
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod data_types;
mod enrich_handler;
mod file_handler;
mod ui;
mod workflow;

use config::Endpoints;
use data_types::{Record, TableData};
use enrich_handler::{EnrichError, EnrichHandler};
use file_handler::{LoadError, SelectedFile};
use ui::{Styles, DARK_THEME, LIGHT_THEME};
use workflow::{Applied, PendingRequest, WorkflowError, WorkflowState, WorkflowStatus};

const VERSION: &str = "0.1.0";

// Fixed notice texts, one per user-visible failure.
const INVALID_TYPE_NOTICE: &str = "Please upload a CSV or Excel file";
const UPLOAD_ERROR_NOTICE: &str = "Error uploading file";
const RERUN_ERROR_NOTICE: &str = "Error re-processing file";
const NO_SNAPSHOT_NOTICE: &str = "No previous file available";

pub fn main() -> iced::Result {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    InsightViewer::run(Settings {
        window: window::Settings {
            size: (900, 700),
            resizable: true,
            ..Default::default()
        },
        ..Settings::default()
    })
}

struct InsightViewer {
    state: WorkflowState,
    table: TableData,
    handler: EnrichHandler,
    notice: Option<String>,
    is_dark_mode: bool,
}

/// Which enrichment service a request targets: the primary upload goes to
/// endpoint A, a re-run of the snapshot to endpoint B.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UploadAction {
    Primary,
    Rerun,
}

#[derive(Debug, Clone)]
enum Message {
    ToggleTheme,
    PickFile,
    FileLoaded(Result<Option<SelectedFile>, LoadError>),
    Upload,
    Rerun,
    EnrichFinished(u64, UploadAction, Result<Vec<Record>, EnrichError>),
    DismissNotice,
}

impl Application for InsightViewer {
    type Executor = executor::Default;
    type Message = Message;
    type Theme = Theme;
    type Flags = ();

    fn new(_flags: ()) -> (Self, Command<Message>) {
        (
            InsightViewer {
                state: WorkflowState::new(),
                table: TableData::empty(),
                handler: EnrichHandler::new(Endpoints::resolve()),
                notice: None,
                is_dark_mode: true,
            },
            Command::none(),
        )
    }

    fn title(&self) -> String {
        format!("Insight Viewer v{}", VERSION)
    }

    fn update(&mut self, message: Message) -> Command<Message> {
        match message {
            Message::ToggleTheme => {
                self.is_dark_mode = !self.is_dark_mode;
                Command::none()
            }

            Message::PickFile => {
                Command::perform(file_handler::pick_and_load(), Message::FileLoaded)
            }

            Message::FileLoaded(Ok(Some(file))) => {
                let name = file.name.clone();
                match self.state.select_file(file) {
                    Ok(()) => {
                        info!("file selected: {}", name);
                    }
                    Err(WorkflowError::InvalidFileType(mime)) => {
                        warn!("rejected selection with declared type {}", mime);
                        self.notice = Some(INVALID_TYPE_NOTICE.to_string());
                    }
                    Err(_) => {}
                }
                Command::none()
            }

            // Dialog cancelled.
            Message::FileLoaded(Ok(None)) => Command::none(),

            Message::FileLoaded(Err(err)) => {
                error!("file load failed: {}", err);
                self.notice = Some(err.to_string());
                Command::none()
            }

            Message::Upload => match self.state.begin_upload() {
                Some(request) => self.dispatch(request, UploadAction::Primary),
                None => Command::none(),
            },

            Message::Rerun => match self.state.begin_rerun() {
                Ok(request) => self.dispatch(request, UploadAction::Rerun),
                Err(WorkflowError::MissingSnapshot) => {
                    self.notice = Some(NO_SNAPSHOT_NOTICE.to_string());
                    Command::none()
                }
                Err(_) => Command::none(),
            },

            Message::EnrichFinished(seq, action, outcome) => {
                if let Err(ref err) = outcome {
                    error!("{:?} request failed: {}", action, err);
                }
                match self.state.finish(seq, outcome) {
                    Applied::Success => {
                        self.table = TableData::from_records(self.state.results());
                    }
                    Applied::Failure => {
                        self.notice = Some(
                            match action {
                                UploadAction::Primary => UPLOAD_ERROR_NOTICE,
                                UploadAction::Rerun => RERUN_ERROR_NOTICE,
                            }
                            .to_string(),
                        );
                    }
                    Applied::Stale => {
                        warn!("dropped stale response for request {}", seq);
                    }
                }
                Command::none()
            }

            Message::DismissNotice => {
                self.notice = None;
                Command::none()
            }
        }
    }

    fn view(&self) -> Element<Message> {
        let styles = self.styles();

        if let Some(notice) = &self.notice {
            return self.notice_view(notice, styles);
        }

        let title = text("Employee engagement insights")
            .size(28)
            .style(styles.fg)
            .horizontal_alignment(Horizontal::Center);

        let selected_line = match self.state.selected() {
            Some(file) => text(format!("Selected file: {}", file.name))
                .size(16)
                .style(styles.accent),
            None => text("No file selected").size(16).style(styles.muted_fg),
        };

        let upload_label = if self.state.status == WorkflowStatus::Uploading {
            "Processing..."
        } else {
            "Upload & Analyze"
        };
        let mut upload_button = button(
            text(upload_label)
                .size(16)
                .horizontal_alignment(Horizontal::Center),
        )
        .padding([10, 24])
        .style(accent_button(styles));
        if self.state.can_upload() {
            upload_button = upload_button.on_press(Message::Upload);
        }

        let mut rerun_button = button(
            text("Re-run last file")
                .size(16)
                .horizontal_alignment(Horizontal::Center),
        )
        .padding([10, 24])
        .style(accent_button(styles));
        if self.state.can_rerun() {
            rerun_button = rerun_button.on_press(Message::Rerun);
        }

        let controls = row![
            button(text("Choose file").size(16))
                .padding([10, 24])
                .style(accent_button(styles))
                .on_press(Message::PickFile),
            upload_button,
            rerun_button,
        ]
        .spacing(10);

        let results: Element<Message> = if self.table.is_empty() {
            container(
                text("No results yet. Upload a CSV or Excel file to see enrichment insights.")
                    .size(18)
                    .style(styles.muted_fg)
                    .horizontal_alignment(Horizontal::Center),
            )
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x()
            .center_y()
            .into()
        } else {
            self.render_table(&self.table, styles)
        };

        let footer = container(
            row![
                text(format!(
                    "Insight Viewer v{} ({})",
                    VERSION,
                    self.state.status.label()
                ))
                .size(14)
                .style(styles.footer_fg),
                Space::with_width(Length::Fill),
                button(text("Theme").size(14).style(styles.footer_fg))
                    .on_press(Message::ToggleTheme)
                    .style(accent_button(styles)),
            ]
            .spacing(5)
            .padding(10)
            .align_items(Alignment::Center),
        )
        .width(Length::Fill)
        .style(panel(styles.footer_bg));

        let main_content = column![
            column![title, selected_line, controls]
                .spacing(15)
                .padding(20)
                .align_items(Alignment::Center)
                .width(Length::Fill),
            results,
            footer,
        ];

        container(main_content)
            .width(Length::Fill)
            .height(Length::Fill)
            .style(panel(styles.bg))
            .into()
    }
}

impl InsightViewer {
    fn styles(&self) -> &'static Styles {
        if self.is_dark_mode {
            &*DARK_THEME
        } else {
            &*LIGHT_THEME
        }
    }

    /// Runs a pending request against the matching endpoint and routes the
    /// outcome back together with its sequence id.
    fn dispatch(&self, request: PendingRequest, action: UploadAction) -> Command<Message> {
        let handler = self.handler.clone();
        let seq = request.seq;
        info!("{:?} upload started: {}", action, request.file.name);

        Command::perform(
            async move {
                match action {
                    UploadAction::Primary => handler.enrich(request.file).await,
                    UploadAction::Rerun => handler.rerun(request.file).await,
                }
            },
            move |outcome| Message::EnrichFinished(seq, action, outcome),
        )
    }

    fn render_table(&self, data: &TableData, styles: &'static Styles) -> Element<Message> {
        let header_row = Row::with_children(
            data.headers
                .iter()
                .map(|header| {
                    container(text(header).size(16).style(styles.header_fg))
                        .width(Length::Fill)
                        .padding(8)
                        .style(panel(styles.header_bg))
                        .into()
                })
                .collect(),
        )
        .spacing(1);

        let body = data
            .rows
            .iter()
            .map(|cells| {
                Row::with_children(
                    cells
                        .iter()
                        .map(|cell| {
                            container(text(cell).size(16).style(styles.fg))
                                .width(Length::Fill)
                                .padding(8)
                                .style(panel(styles.bg))
                                .into()
                        })
                        .collect(),
                )
                .spacing(1)
                .into()
            })
            .collect();

        let table = column![header_row]
            .push(Column::with_children(body))
            .spacing(1)
            .padding(20);

        scrollable(table).height(Length::Fill).into()
    }

    fn notice_view(&self, message: &str, styles: &'static Styles) -> Element<Message> {
        let dialog = container(
            column![
                text(message).size(18).style(styles.fg),
                Space::with_height(Length::Fixed(20.0)),
                button(
                    text("OK")
                        .size(16)
                        .horizontal_alignment(Horizontal::Center)
                )
                .on_press(Message::DismissNotice)
                .padding([8, 30])
                .style(accent_button(styles)),
            ]
            .spacing(10)
            .padding(24)
            .align_items(Alignment::Center),
        )
        .style(panel(styles.header_bg));

        container(dialog)
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x()
            .center_y()
            .style(iced::theme::Container::Custom(Box::new(OverlayStyle)))
            .into()
    }
}

fn panel(bg: Color) -> iced::theme::Container {
    iced::theme::Container::Custom(Box::new(PanelStyle { bg }))
}

fn accent_button(styles: &Styles) -> iced::theme::Button {
    iced::theme::Button::Custom(Box::new(AccentButton {
        bg: styles.accent,
        fg: styles.footer_fg,
    }))
}

struct PanelStyle {
    bg: Color,
}

impl container::StyleSheet for PanelStyle {
    type Style = Theme;

    fn appearance(&self, _style: &Self::Style) -> container::Appearance {
        container::Appearance {
            background: Some(Background::Color(self.bg)),
            ..Default::default()
        }
    }
}

struct OverlayStyle;

impl container::StyleSheet for OverlayStyle {
    type Style = Theme;

    fn appearance(&self, _style: &Self::Style) -> container::Appearance {
        container::Appearance {
            background: Some(Background::Color(Color::from_rgba(0.0, 0.0, 0.0, 0.7))),
            ..Default::default()
        }
    }
}

struct AccentButton {
    bg: Color,
    fg: Color,
}

impl button::StyleSheet for AccentButton {
    type Style = Theme;

    fn active(&self, _style: &Self::Style) -> button::Appearance {
        button::Appearance {
            background: Some(Background::Color(self.bg)),
            border_radius: 6.0.into(),
            text_color: self.fg,
            ..Default::default()
        }
    }

    fn hovered(&self, style: &Self::Style) -> button::Appearance {
        button::Appearance {
            background: Some(Background::Color(Color {
                a: 0.85,
                ..self.bg
            })),
            ..self.active(style)
        }
    }
}
