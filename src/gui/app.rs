use std::{
    sync::Arc,
    time::Duration,
};

use eframe::egui;
use egui_extras::{
    Column,
    TableBuilder,
};

use super::notice::NoticeOverlay;
use crate::{
    catalog::{
        api::{
            CatalogApi,
            HttpCatalog,
        },
        types::{
            Character,
            FavoriteCharacter,
        },
    },
    core::config::CatalogConfig,
    session::{
        BrowsingSession,
        FavoriteAction,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Browse,
    Favorites,
}

pub struct RickdexApp {
    session: BrowsingSession,
    search_input: String,
    tab: Tab,
    selected: Option<Character>,
    favorite_feedback: Option<String>,
    end_was_visible: bool,
}

impl RickdexApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        cc.egui_ctx.set_zoom_factor(cc.egui_ctx.zoom_factor() + 0.2);

        let config = CatalogConfig::default();
        let api: Arc<dyn CatalogApi> =
            Arc::new(HttpCatalog::new(&config).expect("Failed to build the catalog client"));

        let mut session = BrowsingSession::with_debounce(api, config.search_debounce);
        session.start();

        Self {
            session,
            search_input: String::new(),
            tab: Tab::Browse,
            selected: None,
            favorite_feedback: None,
            end_was_visible: false,
        }
    }

    fn show_top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Rickdex");
                ui.separator();
                ui.selectable_value(&mut self.tab, Tab::Browse, "Browse");
                ui.selectable_value(&mut self.tab, Tab::Favorites, "Favorites");
            });
        });
    }

    fn show_detail(&mut self, ctx: &egui::Context) {
        let Some(character) = self.selected.clone() else {
            return;
        };
        let mut close = false;

        egui::SidePanel::right("character_detail").min_width(220.0).show(ctx, |ui| {
            ui.heading(&character.name);
            ui.add_space(8.0);
            ui.label(format!("Status: {}", character.status));
            ui.label(format!("Species: {}", character.species));
            ui.label(format!("Gender: {}", character.gender));
            ui.label(format!("Location: {}", character.location.name));
            ui.hyperlink_to("Portrait", &character.image);
            ui.add_space(12.0);

            let label = if self.session.is_favorite(&character) {
                "★ Remove from favorites"
            } else {
                "☆ Add to favorites"
            };
            if ui.button(label).clicked() {
                self.favorite_feedback = Some(match self.session.toggle_favorite(&character) {
                    FavoriteAction::Added => format!("{} added to favorites", character.name),
                    FavoriteAction::Removed => format!("{} removed from favorites", character.name),
                });
            }
            if let Some(feedback) = &self.favorite_feedback {
                ui.add_space(4.0);
                ui.weak(feedback);
            }

            ui.add_space(12.0);
            if ui.button("Close").clicked() {
                close = true;
            }
        });

        if close {
            self.selected = None;
            self.favorite_feedback = None;
        }
    }

    fn show_browse(&mut self, ctx: &egui::Context) {
        let mut search_edited = false;
        let mut reached_end = false;
        let mut toggled_row: Option<FavoriteCharacter> = None;
        let mut opened: Option<Character> = None;

        egui::CentralPanel::default().show(ctx, |ui| {
            let response = ui.add(
                egui::TextEdit::singleline(&mut self.search_input)
                    .hint_text("Search by name")
                    .desired_width(260.0),
            );
            let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            if response.changed() || submitted {
                search_edited = true;
            }

            ui.add_space(6.0);

            let text_height = egui::TextStyle::Body
                .resolve(ui.style())
                .size
                .max(ui.spacing().interact_size.y);

            let session = &self.session;
            let characters = session.characters();

            TableBuilder::new(ui)
                .striped(true)
                .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
                .column(Column::auto().at_least(170.0))
                .column(Column::auto().at_least(70.0))
                .column(Column::auto().at_least(90.0))
                .column(Column::auto().at_least(70.0))
                .column(Column::remainder())
                .column(Column::auto().at_least(30.0))
                .header(25.0, |mut header| {
                    header.col(|ui| {
                        ui.strong("Name");
                    });
                    header.col(|ui| {
                        ui.strong("Status");
                    });
                    header.col(|ui| {
                        ui.strong("Species");
                    });
                    header.col(|ui| {
                        ui.strong("Gender");
                    });
                    header.col(|ui| {
                        ui.strong("Last known location");
                    });
                    header.col(|ui| {
                        ui.strong("Fav");
                    });
                })
                .body(|mut body| {
                    body.rows(text_height, characters.len(), |mut row| {
                        let record = &characters[row.index()];

                        row.col(|ui| {
                            if ui.link(&record.character.name).clicked() {
                                opened = Some(record.character.clone());
                            }
                        });
                        row.col(|ui| {
                            ui.label(&record.character.status);
                        });
                        row.col(|ui| {
                            ui.label(&record.character.species);
                        });
                        row.col(|ui| {
                            ui.label(&record.character.gender);
                        });
                        row.col(|ui| {
                            ui.label(&record.character.location.name);
                        });
                        row.col(|ui| {
                            let star = if record.is_favorite { "★" } else { "☆" };
                            if ui.button(star).clicked() {
                                toggled_row = Some(record.clone());
                            }
                        });

                        // Rows are virtualized, so rendering the tail means the
                        // user scrolled to it.
                        if session.is_last_in_list(record) {
                            reached_end = true;
                        }
                    });
                });
        });

        if search_edited {
            self.session.set_search_text(self.search_input.clone());
        }
        if let Some(record) = toggled_row {
            self.session.toggle_list_favorite(&record);
        }
        if let Some(character) = opened {
            self.selected = Some(character);
            self.favorite_feedback = None;
        }

        // Edge-trigger: one request per arrival at the tail, not one per frame
        // the tail stays visible.
        if reached_end && !self.end_was_visible {
            self.session.load_more();
        }
        self.end_was_visible = reached_end;
    }

    fn show_favorites(&mut self, ctx: &egui::Context) {
        let mut removed: Option<Character> = None;
        let mut opened: Option<Character> = None;

        egui::CentralPanel::default().show(ctx, |ui| {
            let mut favorites: Vec<Character> = self.session.favorites().cloned().collect();

            if favorites.is_empty() {
                ui.centered_and_justified(|ui| {
                    ui.weak("No favorite characters so far");
                });
                return;
            }

            favorites.sort_by_key(|character| character.id);

            egui::ScrollArea::vertical().show(ui, |ui| {
                for character in &favorites {
                    ui.horizontal(|ui| {
                        if ui.link(&character.name).clicked() {
                            opened = Some(character.clone());
                        }
                        ui.label(&character.species);
                        ui.label(&character.status);
                        if ui.small_button("Remove").clicked() {
                            removed = Some(character.clone());
                        }
                    });
                }
            });
        });

        if let Some(character) = removed {
            self.session.toggle_favorite(&character);
        }
        if let Some(character) = opened {
            self.selected = Some(character);
            self.favorite_feedback = None;
        }
    }
}

impl eframe::App for RickdexApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.session.pump();

        self.show_top_bar(ctx);
        self.show_detail(ctx);
        match self.tab {
            Tab::Browse => self.show_browse(ctx),
            Tab::Favorites => self.show_favorites(ctx),
        }
        NoticeOverlay::show(ctx, &mut self.session);

        // Fetch completions arrive over a channel; keep repainting so pump
        // runs even while the window sits idle.
        ctx.request_repaint_after(Duration::from_millis(150));
    }
}
