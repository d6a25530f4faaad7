//! The navigation shell: owns the active screen controller and routes messages to it.

use crate::controllers::{Context, CreateScreen, DetailScreen, EditScreen, ListScreen, Transition};
use crate::message::{Effect, Message, RequestIds};
use crate::routes::Route;
use crate::telemetry::{Event, Handle};

#[derive(Debug, Clone)]
pub enum Screen {
    List(ListScreen),
    Create(CreateScreen),
    Detail(DetailScreen),
    Edit(EditScreen),
}

impl Screen {
    fn enter(cx: &mut Context<'_>, route: Route) -> (Self, Effect) {
        match route {
            Route::List => {
                let (screen, effect) = ListScreen::start(cx);
                (Screen::List(screen), effect)
            }
            Route::Create => (Screen::Create(CreateScreen::new()), None),
            Route::Detail(id) => {
                let (screen, effect) = DetailScreen::start(cx, id);
                (Screen::Detail(screen), effect)
            }
            Route::Edit(id) => {
                let (screen, effect) = EditScreen::start(cx, id);
                (Screen::Edit(screen), effect)
            }
        }
    }

    fn update(&mut self, cx: &mut Context<'_>, message: Message) -> Transition {
        match self {
            Screen::List(screen) => screen.update(cx, message),
            Screen::Create(screen) => screen.update(cx, message),
            Screen::Detail(screen) => screen.update(cx, message),
            Screen::Edit(screen) => screen.update(cx, message),
        }
    }
}

/// One user session. Front-ends feed it messages and perform whatever request it hands back.
pub struct Session {
    route: Route,
    screen: Screen,
    ids: RequestIds,
    telemetry: Handle,
}

impl Session {
    pub fn new(route: Route) -> (Self, Effect) {
        let mut ids = RequestIds::new();
        let telemetry = Handle::new();
        let (screen, effect) = Screen::enter(&mut Context::new(&mut ids, &telemetry), route);
        telemetry.record(Event::ScreenEntered(route.path()));
        let session = Self {
            route,
            screen,
            ids,
            telemetry,
        };
        (session, effect)
    }

    pub fn route(&self) -> Route {
        self.route
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn telemetry(&self) -> &Handle {
        &self.telemetry
    }

    pub fn update(&mut self, message: Message) -> Effect {
        let transition = match message {
            Message::Navigate(route) => Transition::Navigate(route),
            other => {
                let mut cx = Context::new(&mut self.ids, &self.telemetry);
                self.screen.update(&mut cx, other)
            }
        };

        match transition {
            Transition::Stay(effect) => effect,
            Transition::Navigate(route) => self.navigate(route),
        }
    }

    /// Leaving a screen discards its controller, so answers to its requests become stale.
    fn navigate(&mut self, route: Route) -> Effect {
        tracing::debug!(from = %self.route, to = %route, "navigating");
        let (screen, effect) = Screen::enter(&mut Context::new(&mut self.ids, &self.telemetry), route);
        self.screen = screen;
        self.route = route;
        self.telemetry.record(Event::ScreenEntered(route.path()));
        effect
    }
}
