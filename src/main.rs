use std::future::Future;
use std::sync::Arc;

use iced::widget::{button, column, container, row, text};
use iced::{task, Alignment, Element, Length, Size, Task, Theme};

mod api;
mod config;
mod error;
mod logging;
mod markup;
mod navigation;
mod screens;
mod state;
mod ui;

use api::{HttpApi, PlannerApi};
use config::Config;
use navigation::{Focus, Navigator, Route, Tab};
use screens::{pantry, profile, recipe, search, shopping_list, Effect};
use state::data::RecipeId;
use state::Session;
use ui::notice::Notices;

/// A recipe page on the navigation stack
struct OpenPage {
    page: recipe::RecipePage,
    /// Handles to the page's in-flight requests, aborted when it is popped
    tasks: Vec<task::Handle>,
}

/// Main application state
struct SavvyPlanner {
    /// Backend shared by every request
    api: Arc<dyn PlannerApi>,
    session: Session,
    nav: Navigator,
    search: search::Search,
    pantry: pantry::Pantry,
    profile: profile::Profile,
    shopping: shopping_list::ShoppingList,
    /// Same order as the navigator's recipe stack
    pages: Vec<OpenPage>,
    notices: Notices,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    TabSelected(Tab),
    Back,
    Search(search::Message),
    Pantry(pantry::Message),
    Profile(profile::Message),
    Shopping(shopping_list::Message),
    Recipe(RecipeId, recipe::Message),
    DismissNotice,
}

impl SavvyPlanner {
    /// Create the application, showing `start` first
    fn new(api: Arc<dyn PlannerApi>, session: Session, start: Route) -> (Self, Task<Message>) {
        let mut app = SavvyPlanner {
            api,
            session,
            nav: Navigator::new(),
            search: search::Search::new(),
            pantry: pantry::Pantry::new(),
            profile: profile::Profile::new(),
            shopping: shopping_list::ShoppingList::new(),
            pages: Vec::new(),
            notices: Notices::default(),
        };

        let task = match start {
            Route::Tab(tab) => match app.nav.select_tab(tab) {
                Some(focus) => app.focus(focus),
                None => Task::none(),
            },
            Route::Recipe(id) => app.open_recipe(id),
        };

        (app, task)
    }

    fn title(&self) -> String {
        match self.nav.current() {
            Route::Tab(tab) => format!("Savvy Planner - {}", tab.title()),
            Route::Recipe(_) => {
                let title = self
                    .pages
                    .last()
                    .and_then(|open| open.page.detail())
                    .map(|detail| detail.title.as_str())
                    .unwrap_or("Recipe");
                format!("Savvy Planner - {}", title)
            }
        }
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::TabSelected(tab) => {
                let focus = self.nav.select_tab(tab);
                self.close_popped_pages();
                match focus {
                    Some(focus) => self.focus(focus),
                    None => Task::none(),
                }
            }
            Message::Back => {
                let focus = self.nav.back();
                self.close_popped_pages();
                match focus {
                    Some(focus) => self.focus(focus),
                    None => Task::none(),
                }
            }
            Message::Search(message) => {
                let effect = self.search.update(message);
                self.apply(effect, search::perform, Message::Search)
            }
            Message::Pantry(message) => {
                let effect = self.pantry.update(message);
                self.apply(effect, pantry::perform, Message::Pantry)
            }
            Message::Profile(message) => {
                let effect = self.profile.update(message);
                self.apply(effect, profile::perform, Message::Profile)
            }
            Message::Shopping(message) => {
                let effect = self.shopping.update(message);
                self.apply(effect, shopping_list::perform, Message::Shopping)
            }
            Message::Recipe(id, message) => {
                let Some(open) = self.pages.iter_mut().rev().find(|open| open.page.id() == id) else {
                    tracing::debug!(%id, "dropping message for closed recipe page");
                    return Task::none();
                };
                let effect = open.page.update(message);
                self.apply_recipe(id, effect)
            }
            Message::DismissNotice => {
                self.notices.dismiss();
                Task::none()
            }
        }
    }

    /// Turn a screen's effect into work for the runtime
    fn apply<R, M, Fut>(
        &mut self,
        effect: Effect<R>,
        perform: impl FnOnce(Arc<dyn PlannerApi>, Session, R) -> Fut,
        wrap: impl Fn(M) -> Message + Send + 'static,
    ) -> Task<Message>
    where
        Fut: Future<Output = M> + Send + 'static,
        M: Send + 'static,
    {
        match effect {
            Effect::None => Task::none(),
            Effect::Request(request) => {
                Task::perform(perform(self.api.clone(), self.session, request), wrap)
            }
            Effect::Notify(notice) => {
                self.notices.push(notice);
                Task::none()
            }
            Effect::OpenRecipe(id) => self.open_recipe(id),
        }
    }

    /// Like `apply`, but requests are abortable and owned by the page
    fn apply_recipe(&mut self, id: RecipeId, effect: Effect<recipe::Request>) -> Task<Message> {
        let Effect::Request(request) = effect else {
            return self.apply(effect, recipe::perform, move |m| Message::Recipe(id, m));
        };

        let (task, handle) = Task::perform(
            recipe::perform(self.api.clone(), self.session, request),
            move |m| Message::Recipe(id, m),
        )
        .abortable();

        if let Some(open) = self.pages.iter_mut().rev().find(|open| open.page.id() == id) {
            open.tasks.push(handle);
        }
        task
    }

    fn open_recipe(&mut self, id: RecipeId) -> Task<Message> {
        tracing::info!(%id, "opening recipe");
        self.nav.push_recipe(id);
        let (page, request) = recipe::RecipePage::open(id);
        self.pages.push(OpenPage {
            page,
            tasks: Vec::new(),
        });
        self.apply_recipe(id, Effect::Request(request))
    }

    /// Tear down pages the navigator no longer has on its stack
    fn close_popped_pages(&mut self) {
        while self.pages.len() > self.nav.depth() {
            let Some(mut open) = self.pages.pop() else {
                break;
            };
            open.page.unmount();
            for handle in open.tasks {
                handle.abort();
            }
            tracing::debug!(id = %open.page.id(), "recipe page closed");
        }
    }

    /// A tab came into view
    fn focus(&mut self, focus: Focus) -> Task<Message> {
        match focus.tab {
            Tab::ShoppingList => {
                let effect = self.shopping.update(shopping_list::Message::Focused);
                self.apply(effect, shopping_list::perform, Message::Shopping)
            }
            Tab::Pantry if focus.first_visit => {
                let effect = self.pantry.update(pantry::Message::Mounted);
                self.apply(effect, pantry::perform, Message::Pantry)
            }
            _ => Task::none(),
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<'_, Message> {
        let header: Element<'_, Message> = match self.pages.last() {
            Some(_) => row![
                button("< Back").on_press(Message::Back).style(button::text),
                text("Recipe Details").size(22),
            ]
            .spacing(10)
            .align_y(Alignment::Center)
            .into(),
            None => text(self.nav.active_tab().title()).size(26).into(),
        };

        let body: Element<'_, Message> = match self.pages.last() {
            Some(open) => {
                let id = open.page.id();
                open.page.view().map(move |m| Message::Recipe(id, m))
            }
            None => match self.nav.active_tab() {
                Tab::Search => self.search.view().map(Message::Search),
                Tab::Pantry => self.pantry.view().map(Message::Pantry),
                Tab::Profile => self.profile.view().map(Message::Profile),
                Tab::ShoppingList => self.shopping.view().map(Message::Shopping),
            },
        };

        let content = column![
            container(header).padding([12, 20]),
            container(body).width(Length::Fill).height(Length::Fill),
            ui::tabs::tab_bar(self.nav.active_tab(), Message::TabSelected),
        ];

        ui::notice::overlay(content.into(), &self.notices, Message::DismissNotice)
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Light
    }
}

fn main() -> iced::Result {
    let loaded = Config::load();
    let config = loaded.as_ref().ok().cloned().unwrap_or_default();
    logging::init(&config.log_level);
    if let Err(error) = &loaded {
        tracing::warn!(%error, "could not load configuration, using defaults");
    }

    let api = match HttpApi::new(&config.api_base_url) {
        Ok(api) => api,
        Err(error) => {
            tracing::error!(%error, "could not set up the backend client");
            std::process::exit(1);
        }
    };

    let start = match config.start_route.as_deref().map(str::parse::<Route>) {
        Some(Ok(route)) => route,
        Some(Err(error)) => {
            tracing::warn!(%error, "ignoring configured start route");
            Route::Tab(Tab::Search)
        }
        None => Route::Tab(Tab::Search),
    };

    let session = Session::from_config(&config);
    tracing::info!(
        base_url = %api.base_url(),
        user_id = %session.user_id,
        route = %start,
        "starting Savvy Planner"
    );

    let api: Arc<dyn PlannerApi> = Arc::new(api);
    iced::application(SavvyPlanner::title, SavvyPlanner::update, SavvyPlanner::view)
        .theme(SavvyPlanner::theme)
        .window_size(Size::new(520.0, 860.0))
        .centered()
        .run_with(move || SavvyPlanner::new(api, session, start))
}
