use chrono::{Datelike, Duration, Local, NaiveDate};
use crossterm::event::KeyCode;
use log::warn;
use rusqlite::Connection;

use crate::dates;
use crate::error::{KronosError, Result};
use crate::goals;
use crate::managers::{CategoryManager, ProjectManager, TaskManager, TimerManager};
use crate::report::{self, WeeklyReport};
use crate::stopwatch;
use crate::store::auth;
use crate::types::{Category, Goals, Project, Record, Task, Timer, TimerTags, User};

use super::{AppEvent, AppView, TABS};

/// The top-level application state.
pub struct App {
    pub running: bool,
    pub db: Connection,
    pub user: Option<User>,
    pub view: AppView,
    view_history: Vec<AppView>,
    pub chart_max_hours: f64,
    pub projects: ProjectManager,
    pub categories: CategoryManager,
    pub timers: TimerManager,
    pub tasks: TaskManager,
    pub goals: Goals,
    /// First day of the seven-day window shown by Timers, Categories and Report.
    pub range_start: NaiveDate,
    pub status: Option<String>,
    pub selected_task_index: usize,
    pub selected_timer_index: usize,
    pub selected_project_index: usize,
    pub selected_category_index: usize,
    pub form_popup: Option<FormPopup>,
    pub stopwatch_elapsed: Option<Duration>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormKind {
    NewTask,
    NewCategory,
    NewProject,
    NewTimer,
    Goals,
}

impl FormKind {
    pub fn title(self) -> &'static str {
        match self {
            FormKind::NewTask => "Add Task",
            FormKind::NewCategory => "New category",
            FormKind::NewProject => "New project",
            FormKind::NewTimer => "Log time",
            FormKind::Goals => "Daily goals",
        }
    }

    pub fn labels(self) -> &'static [&'static str] {
        match self {
            FormKind::NewTask => &["Title", "Description"],
            FormKind::NewCategory => &["Name", "Color"],
            FormKind::NewProject => &["Name", "Client", "Description"],
            FormKind::NewTimer => &[
                "Project",
                "Category",
                "Description",
                "Date (d/M/yyyy, blank for today)",
                "Start (HH:mm)",
                "End (HH:mm)",
            ],
            FormKind::Goals => &["Min hours", "Max hours"],
        }
    }
}

/// A text form shown over the current view, one input per label.
#[derive(Clone, Debug)]
pub struct FormPopup {
    pub kind: FormKind,
    pub fields: Vec<String>,
    pub field: usize,
}

impl FormPopup {
    fn new(kind: FormKind) -> Self {
        Self {
            kind,
            fields: vec![String::new(); kind.labels().len()],
            field: 0,
        }
    }

    fn value(&self, index: usize) -> String {
        self.fields
            .get(index)
            .map(|value| value.trim().to_string())
            .unwrap_or_default()
    }
}

impl App {
    pub fn new(db: Connection, chart_max_hours: f64) -> Self {
        let user = match auth::current_user(&db) {
            Ok(user) => user,
            Err(err) => {
                warn!("event=session_lookup module=app status=error err={err}");
                None
            }
        };
        let user_id = user.as_ref().map(|u| u.id);
        let mut app = Self {
            running: true,
            db,
            user,
            view: AppView::Home,
            view_history: Vec::new(),
            chart_max_hours,
            projects: ProjectManager::new(user_id),
            categories: CategoryManager::new(user_id),
            timers: TimerManager::new(user_id),
            tasks: TaskManager::new(user_id),
            goals: Goals::default(),
            range_start: start_of_week(Local::now().date_naive()),
            status: None,
            selected_task_index: 0,
            selected_timer_index: 0,
            selected_project_index: 0,
            selected_category_index: 0,
            form_popup: None,
            stopwatch_elapsed: None,
        };
        app.refresh_all();
        app
    }

    /// Central update function - process an event and mutate state.
    pub fn update(&mut self, event: AppEvent) {
        match event {
            AppEvent::Tick => self.refresh_stopwatch(),
            AppEvent::KeyPress(key) => self.handle_key(key),
        }
    }

    pub fn range(&self) -> (NaiveDate, NaiveDate) {
        report::week_range(self.range_start)
    }

    /// Timers dated inside the current window, with their records.
    pub fn timers_in_range(&self) -> Vec<&Record<Timer>> {
        let (start, end) = self.range();
        self.timers
            .items()
            .iter()
            .filter(|record| {
                dates::parse_date(&record.data.date)
                    .map(|date| date >= start && date <= end)
                    .unwrap_or(false)
            })
            .collect()
    }

    pub fn category_totals(&self) -> Vec<Category> {
        let (start, end) = self.range();
        report::category_totals(&self.categories.values(), &self.timers.values(), start, end)
    }

    pub fn weekly_report(&self) -> WeeklyReport {
        let (start, end) = self.range();
        report::weekday_totals(&self.timers.values(), start, end)
    }

    fn handle_key(&mut self, key: KeyCode) {
        if self.form_popup.is_some() {
            self.handle_form_key(key);
            return;
        }

        match key {
            KeyCode::Char('q') => self.running = false,
            KeyCode::Char('h') => self.navigate_to(AppView::Home),
            KeyCode::Char('t') => self.navigate_to(AppView::Timers),
            KeyCode::Char('p') => self.navigate_to(AppView::Projects),
            KeyCode::Char('c') => self.navigate_to(AppView::Categories),
            KeyCode::Char('w') => self.navigate_to(AppView::Report),
            KeyCode::Char('?') => {
                if self.view == AppView::Help {
                    self.go_back();
                } else {
                    self.navigate_to(AppView::Help);
                }
            }
            KeyCode::Char('r') => self.refresh_all(),
            KeyCode::Tab => self.cycle_tab(1),
            KeyCode::BackTab => self.cycle_tab(TABS.len() - 1),
            KeyCode::Char('[') | KeyCode::Left => self.shift_range(-7),
            KeyCode::Char(']') | KeyCode::Right => self.shift_range(7),
            KeyCode::Up => self.move_selection(false),
            KeyCode::Down => self.move_selection(true),
            KeyCode::Char(' ') => self.toggle_selected_task(),
            KeyCode::Char('d') => self.remove_selected_task(),
            KeyCode::Char('g') => self.open_goals_popup(),
            KeyCode::Char('n') => {
                let kind = match self.view {
                    AppView::Home => FormKind::NewTask,
                    AppView::Timers => FormKind::NewTimer,
                    AppView::Projects => FormKind::NewProject,
                    AppView::Categories => FormKind::NewCategory,
                    AppView::Report | AppView::Help => return,
                };
                self.form_popup = Some(FormPopup::new(kind));
            }
            KeyCode::Esc => self.go_back(),
            _ => {}
        }
    }

    fn navigate_to(&mut self, view: AppView) {
        if self.view != view {
            self.view_history.push(self.view);
            self.view = view;
            self.clear_status();
        }
    }

    fn go_back(&mut self) {
        if let Some(previous) = self.view_history.pop() {
            self.view = previous;
        }
        self.clear_status();
    }

    fn cycle_tab(&mut self, step: usize) {
        let current = TABS.iter().position(|v| *v == self.view).unwrap_or(0);
        self.navigate_to(TABS[(current + step) % TABS.len()]);
    }

    fn shift_range(&mut self, days: i64) {
        if matches!(
            self.view,
            AppView::Timers | AppView::Categories | AppView::Report
        ) {
            self.range_start += Duration::days(days);
            self.selected_timer_index = 0;
        }
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    /// Re-fetches every collection and the goals for the signed-in user.
    fn refresh_all(&mut self) {
        let Some(user) = self.user.clone() else {
            self.status =
                Some("Not signed in. Run `kronos login <email> <password>` first.".to_string());
            return;
        };
        let results = [
            ("projects", self.projects.fetch(&self.db)),
            ("categories", self.categories.fetch(&self.db)),
            ("timers", self.timers.fetch(&self.db)),
            ("tasks", self.tasks.fetch(&self.db)),
        ];
        self.clear_status();
        for (name, result) in results {
            if let Err(err) = result {
                self.status = Some(format!("Failed to load {name}: {err}"));
            }
        }
        match goals::load_goals(&user, &self.db) {
            Ok(goals) => self.goals = goals,
            Err(err) => self.status = Some(format!("Error loading goals: {err}")),
        }
        self.clamp_selections();
        self.refresh_stopwatch();
    }

    fn refresh_stopwatch(&mut self) {
        if let Some(user) = &self.user {
            self.stopwatch_elapsed = stopwatch::elapsed(user, Local::now(), &self.db)
                .ok()
                .flatten();
        }
    }

    fn clamp_selections(&mut self) {
        let clamp = |index: usize, len: usize| index.min(len.saturating_sub(1));
        self.selected_task_index = clamp(self.selected_task_index, self.tasks.items().len());
        self.selected_project_index =
            clamp(self.selected_project_index, self.projects.items().len());
        self.selected_category_index =
            clamp(self.selected_category_index, self.categories.items().len());
        self.selected_timer_index = clamp(self.selected_timer_index, self.timers_in_range().len());
    }

    fn move_selection(&mut self, down: bool) {
        let len = match self.view {
            AppView::Home => self.tasks.items().len(),
            AppView::Timers => self.timers_in_range().len(),
            AppView::Projects => self.projects.items().len(),
            AppView::Categories => self.categories.items().len(),
            AppView::Report | AppView::Help => return,
        };
        let index = match self.view {
            AppView::Home => &mut self.selected_task_index,
            AppView::Timers => &mut self.selected_timer_index,
            AppView::Projects => &mut self.selected_project_index,
            _ => &mut self.selected_category_index,
        };
        if len == 0 {
            *index = 0;
        } else if down {
            *index = (*index + 1).min(len - 1);
        } else {
            *index = index.saturating_sub(1);
        }
    }

    fn toggle_selected_task(&mut self) {
        if self.view != AppView::Home {
            return;
        }
        let index = self.selected_task_index;
        let Some(record) = self.tasks.items().get(index) else {
            self.status = Some("No task selected.".to_string());
            return;
        };
        let completed = !record.data.is_completed;
        match self.tasks.set_completed(index, completed, &self.db) {
            Ok(()) => self.clear_status(),
            Err(err) => self.status = Some(format!("Failed to update task: {err}")),
        }
    }

    fn remove_selected_task(&mut self) {
        if self.view != AppView::Home {
            return;
        }
        match self.tasks.remove_task(self.selected_task_index, &self.db) {
            Ok(removed) => {
                self.status = Some(format!("Removed task '{}'.", removed.data.title));
                self.clamp_selections();
            }
            Err(err) => self.status = Some(format!("Failed to remove task: {err}")),
        }
    }

    fn open_goals_popup(&mut self) {
        if !matches!(self.view, AppView::Home | AppView::Report) {
            return;
        }
        let mut popup = FormPopup::new(FormKind::Goals);
        popup.fields = vec![self.goals.min_goal.clone(), self.goals.max_goal.clone()];
        self.form_popup = Some(popup);
    }

    fn handle_form_key(&mut self, key: KeyCode) {
        let Some(popup) = self.form_popup.as_mut() else {
            return;
        };
        match key {
            KeyCode::Esc => {
                self.form_popup = None;
                self.clear_status();
            }
            KeyCode::Enter => self.apply_form_popup(),
            KeyCode::Tab | KeyCode::Down => popup.field = (popup.field + 1) % popup.fields.len(),
            KeyCode::BackTab | KeyCode::Up => {
                popup.field = (popup.field + popup.fields.len() - 1) % popup.fields.len()
            }
            KeyCode::Backspace | KeyCode::Delete => {
                popup.fields[popup.field].pop();
            }
            KeyCode::Char(ch) => {
                if !ch.is_control() {
                    popup.fields[popup.field].push(ch);
                }
            }
            _ => {}
        }
    }

    fn apply_form_popup(&mut self) {
        let Some(popup) = self.form_popup.clone() else {
            return;
        };
        let result = match popup.kind {
            FormKind::NewTask => self
                .tasks
                .add_task(
                    Task {
                        title: popup.value(0),
                        description: popup.value(1),
                        is_completed: false,
                    },
                    &self.db,
                )
                .map(|_| "Task added.".to_string()),
            FormKind::NewCategory => {
                let color = Some(popup.value(1)).filter(|c| !c.is_empty());
                self.categories
                    .add_category(&popup.value(0), color, &self.db)
                    .map(|record| format!("Category '{}' created.", record.data.name))
            }
            FormKind::NewProject => self
                .projects
                .add_project(
                    Project {
                        project_name: popup.value(0),
                        client: popup.value(1),
                        description: popup.value(2),
                    },
                    &self.db,
                )
                .map(|record| format!("Project '{}' created.", record.data.project_name)),
            FormKind::NewTimer => self.log_time(&popup),
            FormKind::Goals => {
                let Some(user) = self.user.clone() else {
                    self.status = Some("User not logged in".to_string());
                    return;
                };
                let goals = Goals {
                    min_goal: popup.value(0),
                    max_goal: popup.value(1),
                };
                goals::save_goals(&user, &goals, &self.db).map(|()| {
                    self.goals = goals;
                    "Hours saved successfully".to_string()
                })
            }
        };
        match result {
            Ok(message) => {
                self.form_popup = None;
                self.status = Some(message);
            }
            // Keep the form open so the input can be corrected.
            Err(err) => self.status = Some(err.to_string()),
        }
    }

    /// Builds a timer from the form, taking the client from the named project.
    fn log_time(&mut self, popup: &FormPopup) -> Result<String> {
        let project = popup.value(0);
        let category = popup.value(1);
        let description = popup.value(2);
        let Some(known) = self.projects.find_by_name(&project) else {
            return Err(KronosError::Validation(format!("Project '{project}' not found")));
        };
        if self.categories.find_by_name(&category).is_none() {
            return Err(KronosError::Validation(format!("Category '{category}' not found")));
        }
        if description.is_empty() {
            return Err(KronosError::Validation("Please enter a description.".to_string()));
        }
        let tags = TimerTags {
            client: known.client.clone(),
            project,
            category,
            description,
        };
        let date = Some(popup.value(3))
            .filter(|date| !date.is_empty())
            .unwrap_or_else(|| dates::format_date(Local::now().date_naive()));
        let timer = Timer::from_times(tags, &date, &popup.value(4), &popup.value(5))?;
        let record = self.timers.add_timer(timer, &self.db)?;
        Ok(format!(
            "Logged {:.2}h on {}.",
            record.data.hours, record.data.date
        ))
    }
}

fn start_of_week(day: NaiveDate) -> NaiveDate {
    day - Duration::days(day.weekday().num_days_from_monday() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::open_in_memory;

    fn signed_in_app() -> App {
        let conn = open_in_memory().unwrap();
        auth::sign_up("xan@example.com", "pw", "pw", &conn).unwrap();
        auth::sign_in("xan@example.com", "pw", &conn).unwrap();
        App::new(conn, report::DEFAULT_CHART_MAX_HOURS)
    }

    fn type_text(app: &mut App, text: &str) {
        for ch in text.chars() {
            app.update(AppEvent::KeyPress(KeyCode::Char(ch)));
        }
    }

    #[test]
    fn signed_out_app_reports_status() {
        let app = App::new(open_in_memory().unwrap(), 10.0);
        assert!(app.user.is_none());
        assert!(app.status.as_deref().unwrap().contains("Not signed in"));
    }

    #[test]
    fn new_task_form_adds_and_persists() {
        let mut app = signed_in_app();
        app.update(AppEvent::KeyPress(KeyCode::Char('n')));
        type_text(&mut app, "Write");
        app.update(AppEvent::KeyPress(KeyCode::Tab));
        type_text(&mut app, "report");
        app.update(AppEvent::KeyPress(KeyCode::Enter));

        assert!(app.form_popup.is_none());
        assert_eq!(app.tasks.items().len(), 1);
        assert!(app.tasks.items()[0].id.is_some());

        app.update(AppEvent::KeyPress(KeyCode::Char(' ')));
        assert!(app.tasks.items()[0].data.is_completed);
        app.update(AppEvent::KeyPress(KeyCode::Char('d')));
        assert!(app.tasks.items().is_empty());
    }

    #[test]
    fn blank_goal_keeps_form_open() {
        let mut app = signed_in_app();
        app.update(AppEvent::KeyPress(KeyCode::Char('g')));
        type_text(&mut app, "4");
        app.update(AppEvent::KeyPress(KeyCode::Enter));
        assert!(app.form_popup.is_some());
        assert!(app.status.is_some());

        app.update(AppEvent::KeyPress(KeyCode::Tab));
        type_text(&mut app, "8");
        app.update(AppEvent::KeyPress(KeyCode::Enter));
        assert!(app.form_popup.is_none());
        assert_eq!(app.goals.thresholds(), (Some(4.0), Some(8.0)));
    }

    #[test]
    fn range_shifts_by_week_on_report() {
        let mut app = signed_in_app();
        let start = app.range_start;
        app.update(AppEvent::KeyPress(KeyCode::Char(']')));
        assert_eq!(app.range_start, start);
        app.update(AppEvent::KeyPress(KeyCode::Char('w')));
        app.update(AppEvent::KeyPress(KeyCode::Char(']')));
        assert_eq!(app.range_start, start + Duration::days(7));
        app.update(AppEvent::KeyPress(KeyCode::Esc));
        assert_eq!(app.view, AppView::Home);
    }

    fn press(app: &mut App, key: KeyCode) {
        app.update(AppEvent::KeyPress(key));
    }

    fn fill_form(app: &mut App, values: &[&str]) {
        for (index, value) in values.iter().enumerate() {
            if index > 0 {
                press(app, KeyCode::Tab);
            }
            type_text(app, value);
        }
        press(app, KeyCode::Enter);
    }

    #[test]
    fn project_and_timer_forms_record_time() {
        let mut app = signed_in_app();
        press(&mut app, KeyCode::Char('p'));
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.form_popup.as_ref().unwrap().kind, FormKind::NewProject);
        fill_form(&mut app, &["Website", "Acme", "Landing page"]);
        assert!(app.form_popup.is_none());
        assert_eq!(app.projects.items().len(), 1);
        app.categories.add_category("Design", None, &app.db).unwrap();

        press(&mut app, KeyCode::Char('t'));
        press(&mut app, KeyCode::Char('n'));
        fill_form(
            &mut app,
            &["Website", "Design", "Mockups", "3/6/2024", "09:00", "10:30"],
        );
        assert!(app.form_popup.is_none());
        let timer = &app.timers.items()[0];
        assert!(timer.id.is_some());
        assert_eq!(timer.data.client, "Acme");
        assert_eq!(timer.data.hours, 1.5);
    }

    #[test]
    fn timer_form_stays_open_on_bad_input() {
        let mut app = signed_in_app();
        press(&mut app, KeyCode::Char('t'));
        press(&mut app, KeyCode::Char('n'));
        fill_form(&mut app, &["Nowhere", "Design", "Mockups", "", "09:00", "10:00"]);
        assert!(app.form_popup.is_some());
        assert!(app.status.as_deref().unwrap().contains("not found"));
        assert!(app.timers.items().is_empty());
    }
}
