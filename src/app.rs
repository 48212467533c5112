use std::path::PathBuf;

use gantt_core::config::AppConfig;
use gantt_core::model::task::{add_task, duplicate_task, remove_task, replace_task};
use gantt_core::model::{CalendarDate, GestureResolver, GestureUpdate, Project, Task, ZoomLevel};
use uuid::Uuid;

use crate::ui;
use crate::ui::task_table::TaskTableAction;

/// Main application state.
pub struct GanttApp {
    pub project: Project,
    pub config: AppConfig,
    pub zoom: ZoomLevel,
    pub gestures: GestureResolver,
    /// Cutoff date of the progress line, when shown.
    pub baseline: Option<CalendarDate>,
    pub file_path: Option<PathBuf>,
    pub selected_task: Option<Uuid>,
    pub status_message: String,
}

impl GanttApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        ui::theme::apply_theme(&cc.egui_ctx);
        let config = AppConfig::load();

        Self {
            project: Self::sample_project(&config),
            zoom: config.zoom(),
            config,
            gestures: GestureResolver::new(),
            baseline: None,
            file_path: None,
            selected_task: None,
            status_message: "Ready".to_string(),
        }
    }

    /// Generate a sample project for demonstration.
    fn sample_project(config: &AppConfig) -> Project {
        let today = CalendarDate::today();
        let mut project = config.new_project();
        project.project_name = "Sample Project".to_string();
        project.set_window(today.add_days(-7), today.add_days(60));

        let mut kickoff = Task::new("Project Kickoff")
            .with_dates(today.add_days(-5), today.add_days(-3))
            .with_progress(100);
        kickoff.assignee = Some("Alice".to_string());

        let mut requirements = Task::new("Requirements Gathering")
            .with_dates(today.add_days(-3), today.add_days(6))
            .with_progress(60);
        requirements.man_hours = Some(40.0);

        let design = Task::new("System Design")
            .with_dates(today.add_days(4), today.add_days(15))
            .with_progress(10);
        let implementation = Task::new("Implementation").with_dates(today.add_days(14), today.add_days(40));
        let testing = Task::new("Testing");

        project.set_tasks(vec![kickoff, requirements, design, implementation, testing]);
        project
    }

    // --- File operations ---

    pub fn new_project(&mut self) {
        self.project = self.config.new_project();
        self.gestures = GestureResolver::new();
        self.file_path = None;
        self.selected_task = None;
        self.status_message = "New project created".to_string();
    }

    pub fn open_project(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Gantt Project", &["json"])
            .pick_file()
        {
            match gantt_core::io::load_project(&path) {
                Ok(project) => {
                    self.project = project;
                    self.gestures = GestureResolver::new();
                    self.file_path = Some(path);
                    self.selected_task = None;
                    self.status_message = "Project loaded".to_string();
                }
                Err(e) => {
                    tracing::error!(path = %path.display(), error = %e, "failed to load project");
                    self.status_message = format!("Error loading: {}", e);
                }
            }
        }
    }

    pub fn save_project(&mut self) {
        if let Some(path) = self.file_path.clone() {
            self.write_to(&path);
        } else {
            self.save_project_as();
        }
    }

    pub fn save_project_as(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Gantt Project", &["json"])
            .set_file_name(format!("{}.json", self.project.project_name))
            .save_file()
        {
            self.file_path = Some(path.clone());
            self.write_to(&path);
        }
    }

    fn write_to(&mut self, path: &std::path::Path) {
        match gantt_core::io::save_project(&self.project, path) {
            Ok(()) => self.status_message = "Project saved".to_string(),
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "failed to save project");
                self.status_message = format!("Error saving: {}", e);
            }
        }
    }

    // --- Task list ---

    fn apply_table_action(&mut self, action: TaskTableAction) {
        let tasks = &self.project.tasks;
        match action {
            TaskTableAction::None => {}
            TaskTableAction::Select(id) => self.selected_task = Some(id),
            TaskTableAction::Update(task) => {
                self.status_message = format!("Updated '{}'", task.name);
                let next = replace_task(tasks, task);
                self.project.set_tasks(next);
            }
            TaskTableAction::Duplicate(id) => {
                let next = duplicate_task(tasks, id);
                self.project.set_tasks(next);
                self.status_message = "Task duplicated".to_string();
            }
            TaskTableAction::Delete(id) => {
                let next = remove_task(tasks, id);
                self.project.set_tasks(next);
                if self.selected_task == Some(id) {
                    self.selected_task = None;
                }
                self.status_message = "Task deleted".to_string();
            }
            TaskTableAction::Add => {
                let next = add_task(tasks, "New Task");
                self.selected_task = next.last().map(|t| t.id);
                self.project.set_tasks(next);
                self.status_message = "Task added".to_string();
            }
            TaskTableAction::Reorder(next) => {
                self.project.set_tasks(next);
                self.status_message = "Tasks reordered".to_string();
            }
        }
    }

    fn describe_update(&self, update: GestureUpdate) -> Option<String> {
        match update {
            GestureUpdate::None => None,
            GestureUpdate::Dates { task_id, start, end } => {
                let task = self.project.tasks.iter().find(|t| t.id == task_id)?;
                Some(format!("'{}' {} → {}", task.name, start, end))
            }
            GestureUpdate::DropTarget { index, .. } => Some(format!("Drop at row {}", index + 1)),
        }
    }
}

impl eframe::App for GanttApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Handle keyboard shortcuts outside closures to avoid borrow issues
        let should_save = ctx.input(|i| i.modifiers.ctrl && i.key_pressed(egui::Key::S));
        if should_save {
            self.save_project();
        }

        // A release outside every widget (or a lost window focus) still ends
        // the gesture.
        let pointer_up = ctx.input(|i| !i.pointer.any_down());
        if self.gestures.is_active() && pointer_up {
            if let Some(next) = self.gestures.release(&self.project.tasks) {
                self.project.set_tasks(next);
                self.status_message = "Timeline updated".to_string();
            }
        }

        // Top panel: toolbar
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui::toolbar::show_toolbar(self, ui);
        });

        // Bottom panel: status bar
        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(ui::theme::STATUS_BAR_HEIGHT)
            .frame(
                egui::Frame::default()
                    .fill(ui::theme::BG_HEADER)
                    .inner_margin(egui::Margin::symmetric(10.0, 0.0)),
            )
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    ui.label(
                        egui::RichText::new(&self.status_message)
                            .font(ui::theme::font_sub())
                            .color(ui::theme::TEXT_SECONDARY),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(
                            egui::RichText::new(format!("Tasks: {}", self.project.tasks.len()))
                                .size(10.5)
                                .color(ui::theme::TEXT_DIM),
                        );
                        ui.label(egui::RichText::new(" · ").size(10.5).color(ui::theme::TEXT_DIM));
                        ui.label(
                            egui::RichText::new(format!("{} px/day", self.zoom.day_width()))
                                .size(10.5)
                                .color(ui::theme::TEXT_DIM),
                        );
                    });
                });
            });

        // Left panel: task table
        let mut task_action = TaskTableAction::None;
        egui::SidePanel::left("task_panel")
            .default_width(ui::theme::SIDE_PANEL_WIDTH)
            .show(ctx, |ui| {
                task_action = ui::task_table::show_task_table(
                    &self.project,
                    &mut self.gestures,
                    self.selected_task,
                    ui,
                );
            });
        self.apply_table_action(task_action);

        // Central panel: Gantt chart
        let chart_frame = egui::Frame::default()
            .fill(ui::theme::BG_DARK)
            .inner_margin(egui::Margin::ZERO);
        let mut interaction = ui::gantt_chart::ChartInteraction::default();
        egui::CentralPanel::default().frame(chart_frame).show(ctx, |ui| {
            interaction = ui::gantt_chart::show_gantt_chart(
                &self.project,
                &mut self.zoom,
                &mut self.gestures,
                self.baseline,
                &mut self.selected_task,
                ui,
            );
        });

        if let Some(message) = interaction.update.and_then(|u| self.describe_update(u)) {
            self.status_message = message;
        }
        if let Some(next) = interaction.committed {
            self.project.set_tasks(next);
            self.status_message = "Timeline updated".to_string();
        }
    }
}
