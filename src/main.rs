use iced::widget::{button, column, container, row, scrollable, text};
use iced::{window, Element, Length, Subscription, Task, Theme};
use rfd::FileDialog;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod preview;
mod state;
mod submit;
mod ui;

use config::Config;
use error::EditorError;
use preview::host::IcedPreviewHost;
use preview::lifecycle::RenderPass;
use preview::probe::probe_dimensions;
use state::data::{SelectedFile, StagedImage};
use state::session::EditorSession;
use submit::quick::QuickSwap;
use submit::{HttpTransport, Resize, SubmissionController};

const WINDOW_WIDTH: f32 = 720.0;
const WINDOW_HEIGHT: f32 = 900.0;
/// Outer padding around the editor card
const PAGE_PADDING: f32 = 40.0;

/// Which form is on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Advanced,
    Quick,
}

/// Main application state
struct PoseEditor {
    config: Config,
    transport: HttpTransport,
    /// The document being edited and everything touched so far
    session: EditorSession<IcedPreviewHost>,
    submission: SubmissionController,
    resize: Resize,
    screen: Screen,
    quick: QuickSwap,
    /// Latest error or warning; replaces any earlier one
    banner: Option<String>,
    /// Status message to display to the user
    status: String,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    ShowScreen(Screen),
    ChoosePose,
    ClearPose,
    AuthorChanged(String),
    DescriptionChanged(String),
    VersionChanged(String),
    TagInputChanged(String),
    TagInputSubmitted,
    RemoveTag(usize),
    ChooseImage,
    ClearImage,
    /// Natural dimensions of a rendered preview are known (or unknowable)
    PreviewProbed {
        seq: u64,
        dimensions: Option<(u32, u32)>,
    },
    ResizeSelected(Resize),
    Create,
    StartOver,
    QuickChoosePose,
    QuickChooseImage,
    QuickPoseUrlChanged(String),
    QuickImageUrlChanged(String),
    QuickSubmit,
    /// Background submission finished with the saved file or an error
    SubmitComplete(Result<PathBuf, EditorError>),
    WindowResized(f32),
}

impl PoseEditor {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        let config = Config::load();
        let transport = HttpTransport::new(&config.server_url);
        info!("🎨 Pose Editor initialized, endpoint {}", config.server_url);

        let mut session = EditorSession::new(IcedPreviewHost::new());
        session
            .image_mut()
            .set_container_width(WINDOW_WIDTH - 2.0 * PAGE_PADDING);

        let editor = PoseEditor {
            resize: config.default_resize,
            config,
            transport,
            session,
            submission: SubmissionController::new(),
            screen: Screen::Advanced,
            quick: QuickSwap::default(),
            banner: None,
            status: String::from("Ready. Choose a .pose file to start."),
        };

        (editor, Task::none())
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::ShowScreen(screen) => {
                self.screen = screen;
                self.banner = None;
                Task::none()
            }
            Message::ChoosePose => {
                self.banner = None;
                let Some(path) = pick_pose_file() else {
                    return Task::none();
                };

                match SelectedFile::from_path(&path).and_then(|file| self.session.load_file(file)) {
                    Ok(pass) => {
                        self.status = format!("Loaded {}", path.display());
                        probe(pass)
                    }
                    Err(e) => {
                        self.banner = Some(e.to_string());
                        Task::none()
                    }
                }
            }
            Message::ClearPose => {
                self.banner = None;
                self.status = String::from("Ready. Choose a .pose file to start.");
                probe(self.session.clear())
            }
            Message::AuthorChanged(value) => {
                self.session.set_author(value);
                Task::none()
            }
            Message::DescriptionChanged(value) => {
                self.session.set_description(value);
                Task::none()
            }
            Message::VersionChanged(value) => {
                self.session.set_version(value);
                Task::none()
            }
            Message::TagInputChanged(value) => {
                self.session.edit_tag_input(value);
                Task::none()
            }
            Message::TagInputSubmitted => {
                self.session.submit_tag_input();
                Task::none()
            }
            Message::RemoveTag(index) => {
                self.session.remove_tag(index);
                Task::none()
            }
            Message::ChooseImage => {
                self.banner = None;
                let Some(path) = pick_image_file() else {
                    return Task::none();
                };

                match StagedImage::from_path(&path)
                    .and_then(|staged| self.session.show_replacement(staged))
                {
                    Ok(pass) => probe(pass),
                    Err(e) => {
                        self.banner = Some(e.to_string());
                        Task::none()
                    }
                }
            }
            Message::ClearImage => probe(self.session.clear_image()),
            Message::PreviewProbed { seq, dimensions } => {
                self.session.image_mut().finish_render(seq, dimensions);
                Task::none()
            }
            Message::ResizeSelected(resize) => {
                self.resize = resize;
                Task::none()
            }
            Message::Create => {
                self.banner = None;
                match self.submission.prepare(&self.session, self.resize) {
                    Ok(prepared) => {
                        self.banner = prepared.warning.map(str::to_string);
                        self.status = String::from("Creating...");
                        self.send(prepared.request)
                    }
                    Err(e) => {
                        self.banner = Some(e.to_string());
                        Task::none()
                    }
                }
            }
            Message::StartOver => {
                // Discard everything and come back to the blank editor
                let pass = self.session.clear();
                self.quick = QuickSwap::default();
                self.resize = self.config.default_resize;
                self.banner = None;
                self.status = String::from("Ready. Choose a .pose file to start.");
                probe(pass)
            }
            Message::QuickChoosePose => {
                if let Some(path) = pick_pose_file() {
                    self.quick.pose_file = self.report(SelectedFile::from_path(&path));
                }
                Task::none()
            }
            Message::QuickChooseImage => {
                if let Some(path) = pick_image_file() {
                    self.quick.image_file = self.report(StagedImage::from_path(&path));
                }
                Task::none()
            }
            Message::QuickPoseUrlChanged(url) => {
                self.quick.pose_url = url;
                Task::none()
            }
            Message::QuickImageUrlChanged(url) => {
                self.quick.image_url = url;
                Task::none()
            }
            Message::QuickSubmit => {
                self.banner = None;
                match self.submission.prepare_quick(&self.quick) {
                    Ok(request) => {
                        self.status = String::from("Creating...");
                        self.send(request)
                    }
                    Err(e) => {
                        self.banner = Some(e.to_string());
                        Task::none()
                    }
                }
            }
            Message::SubmitComplete(result) => {
                // Working state is kept so the user can submit again
                match self.submission.finish(result) {
                    Ok(path) => self.status = format!("✅ Saved {}", path.display()),
                    Err(e) => {
                        self.status = String::from("Ready.");
                        self.banner = Some(e.to_string());
                    }
                }
                Task::none()
            }
            Message::WindowResized(width) => {
                self.session
                    .image_mut()
                    .set_container_width(width - 2.0 * PAGE_PADDING);
                Task::none()
            }
        }
    }

    /// Post a prepared request in the background and save the result
    fn send(&self, request: submit::form::OutboundRequest) -> Task<Message> {
        let transport = self.transport.clone();
        let download_dir = self.config.download_dir();

        Task::perform(
            async move { submit::perform(&transport, request, &download_dir).await },
            Message::SubmitComplete,
        )
    }

    /// Keep the value or show its error in the banner
    fn report<T>(&mut self, result: Result<T, EditorError>) -> Option<T> {
        result
            .map_err(|e| {
                warn!("{}", e);
                self.banner = Some(e.to_string());
            })
            .ok()
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let busy = self.submission.is_busy();

        let tabs = row![
            tab_button("Advanced Editor", Screen::Advanced, self.screen),
            tab_button("Quick Image Swap", Screen::Quick, self.screen),
        ]
        .spacing(8);

        let body = match self.screen {
            Screen::Advanced => ui::editor::view(&self.session, self.resize, busy),
            Screen::Quick => ui::quick::view(&self.quick, busy),
        };

        let mut content = column![text("Pose Editor").size(36), tabs].spacing(20);
        if let Some(message) = &self.banner {
            content = content.push(ui::banner(message));
        }
        content = content.push(body).push(text(&self.status).size(14));

        container(scrollable(content.padding(PAGE_PADDING)))
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    fn subscription(&self) -> Subscription<Message> {
        window::resize_events().map(|(_id, size)| Message::WindowResized(size.width))
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn tab_button(label: &str, screen: Screen, current: Screen) -> Element<'_, Message> {
    let style = if screen == current {
        button::primary
    } else {
        button::secondary
    };
    button(label)
        .on_press(Message::ShowScreen(screen))
        .style(style)
        .padding(8)
        .into()
}

/// Start the dimension probe for a render pass
fn probe(pass: RenderPass) -> Task<Message> {
    let RenderPass { seq, source } = pass;
    Task::perform(probe_dimensions(source), move |dimensions| {
        Message::PreviewProbed { seq, dimensions }
    })
}

fn pick_pose_file() -> Option<PathBuf> {
    FileDialog::new()
        .set_title("Select a .pose file")
        .add_filter("Pose", &["pose", "json"])
        .pick_file()
}

fn pick_image_file() -> Option<PathBuf> {
    FileDialog::new()
        .set_title("Select a replacement image")
        .add_filter("Images", &["png", "jpg", "jpeg", "gif", "webp", "bmp"])
        .pick_file()
}

fn main() -> iced::Result {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pose_editor=info")),
        )
        .init();

    iced::application("Pose Editor", PoseEditor::update, PoseEditor::view)
        .subscription(PoseEditor::subscription)
        .theme(PoseEditor::theme)
        .window_size((WINDOW_WIDTH, WINDOW_HEIGHT))
        .centered()
        .run_with(PoseEditor::new)
}
