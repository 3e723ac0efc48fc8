use std::fmt;

use inquire::{
    CustomUserError, InquireError, Select, Text,
    autocompletion::{Autocomplete, Replacement},
};
use weather_core::{View, WeatherApp, WeatherProvider, search::LocationSearch};

use crate::{
    cli::{settle, today},
    render,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuItem {
    Show(View),
    ChangeLocation,
    Quit,
}

impl MenuItem {
    fn all() -> Vec<MenuItem> {
        View::all()
            .iter()
            .copied()
            .map(MenuItem::Show)
            .chain([MenuItem::ChangeLocation, MenuItem::Quit])
            .collect()
    }
}

impl fmt::Display for MenuItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MenuItem::Show(view) => write!(f, "{view}"),
            MenuItem::ChangeLocation => f.write_str("Change location"),
            MenuItem::Quit => f.write_str("Quit"),
        }
    }
}

/// Feeds the prompt from the same suggestion filter the app uses.
#[derive(Debug, Clone)]
struct LocationCompleter(LocationSearch);

impl Autocomplete for LocationCompleter {
    fn get_suggestions(&mut self, input: &str) -> Result<Vec<String>, CustomUserError> {
        self.0.set_text(input);
        Ok(self.0.suggestions().iter().map(|s| s.to_string()).collect())
    }

    fn get_completion(
        &mut self,
        _input: &str,
        highlighted_suggestion: Option<String>,
    ) -> Result<Replacement, CustomUserError> {
        Ok(highlighted_suggestion)
    }
}

/// Escape backs out of a prompt instead of ending the session.
fn optional<T>(answer: Result<T, InquireError>) -> anyhow::Result<Option<T>> {
    match answer {
        Ok(value) => Ok(Some(value)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub async fn run(app: &mut WeatherApp, provider: &dyn WeatherProvider) -> anyhow::Result<()> {
    let dispatch = app.submit_current(today());
    settle(app.current_mut(), dispatch, provider).await;
    print_active(app);

    loop {
        let title = format!("[{}] What next?", app.search().committed());
        let Some(choice) = optional(Select::new(&title, MenuItem::all()).prompt())? else {
            return Ok(());
        };

        match choice {
            MenuItem::Quit => return Ok(()),
            MenuItem::ChangeLocation => change_location(app, provider).await?,
            MenuItem::Show(view) => show(app, provider, view).await?,
        }
    }
}

async fn change_location(
    app: &mut WeatherApp,
    provider: &dyn WeatherProvider,
) -> anyhow::Result<()> {
    let completer = LocationCompleter(app.search().clone());
    let answer = Text::new("Location:")
        .with_initial_value(app.search().committed())
        .with_autocomplete(completer)
        .prompt();
    let Some(location) = optional(answer)? else {
        return Ok(());
    };

    let dispatch = app.commit_location(&location, today());
    settle(app.current_mut(), dispatch, provider).await;
    print_active(app);
    Ok(())
}

async fn show(
    app: &mut WeatherApp,
    provider: &dyn WeatherProvider,
    view: View,
) -> anyhow::Result<()> {
    let today = today();
    let dispatch = app.select_view(view, today);
    settle(app.current_mut(), dispatch, provider).await;

    match view {
        View::Current => {}
        View::Historical => {
            let default_date = today.to_string();
            let answer = Text::new("Date (YYYY-MM-DD):").with_default(&default_date).prompt();
            let Some(date) = optional(answer)? else {
                return Ok(());
            };
            let dispatch = app.submit_historical(Some(&date), today);
            settle(app.historical_mut(), dispatch, provider).await;
        }
        View::Marine => {
            let Some(lat) = optional(Text::new("Latitude:").prompt())? else {
                return Ok(());
            };
            let Some(lon) = optional(Text::new("Longitude:").prompt())? else {
                return Ok(());
            };
            let dispatch = app.submit_marine(&lat, &lon, today);
            settle(app.marine_mut(), dispatch, provider).await;
        }
    }

    print_active(app);
    Ok(())
}

fn print_active(app: &WeatherApp) {
    let out = match app.active_view() {
        View::Current => render::current(app.current().display()),
        View::Historical => render::historical(app.historical().display()),
        View::Marine => render::marine(app.marine().display()),
    };
    println!("\n{out}");
}
