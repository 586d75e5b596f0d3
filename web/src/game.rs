use crate::position::GeoWatcher;
use crate::utils::SaveSlot;
use geomerge_core as game;
use gloo::timers::callback::Timeout;
use yew::prelude::*;

/// Cells drawn around the player in each direction. The render model pads
/// this by one more cell of margin.
const VIEW_RADIUS: i64 = 5;

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Msg {
    CellClicked(game::Cell),
    Step(i64, i64),
    /// Leave position-driven movement and go back to keyboard steps.
    UseKeys,
    ToggleFollow,
    SnapToPosition,
    /// Sample from the continuous watch; only honored while following.
    WatchSample(game::GeoSample),
    /// Sample from the one-shot snap request; always applied.
    Snapped(game::GeoSample),
    PositionFailed(String),
    AutosaveFired,
    NewGame,
}

#[derive(Properties, Debug, Clone, PartialEq)]
pub(crate) struct GameProps {
    /// Goal override from the URL fragment
    #[prop_or_default]
    pub goal: Option<u64>,
    /// World seed override from the URL fragment
    #[prop_or_default]
    pub seed: Option<u64>,
}

#[derive(Properties, Clone, PartialEq)]
struct CellProps {
    view: game::CellView,
    is_player: bool,
    callback: Callback<game::Cell>,
}

#[function_component(CellTile)]
fn cell_tile(props: &CellProps) -> Html {
    let CellProps {
        view,
        is_player,
        callback,
    } = props.clone();

    let class = classes!(
        "cell",
        view.near.then_some("near"),
        is_player.then_some("player"),
        view.token.value().map(|v| format!("t-{}", v)),
    );
    let onclick = Callback::from(move |_: MouseEvent| callback.emit(view.cell));
    let label = view.token.value().map(|v| v.to_string()).unwrap_or_default();

    html! {
        <td {class} {onclick}>{label}</td>
    }
}

fn token_label(token: game::Token) -> String {
    token.value().map_or_else(|| "·".to_owned(), |v| v.to_string())
}

fn outcome_status(outcome: game::ClickOutcome) -> String {
    use game::ClickOutcome::*;
    match outcome {
        TooFar => "too far away".to_owned(),
        NothingToPickUp => "nothing to pick up".to_owned(),
        Incompatible => "tokens don't match".to_owned(),
        PickedUp {
            value,
            goal_reached,
        } => with_goal(format!("picked up {}", value), goal_reached),
        Placed { value } => format!("placed {}", value),
        Merged {
            value,
            goal_reached,
        } => with_goal(format!("merged into {}", value), goal_reached),
    }
}

fn with_goal(text: String, goal_reached: bool) -> String {
    if goal_reached {
        format!("{}, goal reached!", text)
    } else {
        text
    }
}

pub(crate) struct GameView {
    world: game::GameWorld,
    status: String,
    debounce: game::Debounce,
    save_timer: Option<Timeout>,
    watcher: GeoWatcher,
}

impl GameView {
    /// Window centered on the player; moving recenters it on the next view.
    ///
    /// Corners sit on cell centers rather than cell boundaries so the window
    /// always maps back to exactly the intended cell range and the rendered
    /// grid keeps a fixed width.
    fn viewport(&self) -> game::GeoRect {
        let (row, col) = self.world.player_cell();
        let (min_lat, min_lng) = game::cell_center((row - VIEW_RADIUS, col - VIEW_RADIUS));
        let (max_lat, max_lng) = game::cell_center((row + VIEW_RADIUS, col + VIEW_RADIUS));
        game::GeoRect {
            min_lat,
            min_lng,
            max_lat,
            max_lng,
        }
    }

    fn schedule_save(&mut self, ctx: &Context<Self>) {
        if let Some(delay) = self.debounce.request() {
            let link = ctx.link().clone();
            self.save_timer = Some(Timeout::new(delay, move || {
                link.send_message(Msg::AutosaveFired);
            }));
        }
    }

    fn start_watch(&mut self, ctx: &Context<Self>) -> bool {
        let sample_link = ctx.link().clone();
        let error_link = ctx.link().clone();
        match self.watcher.watch(
            move |sample| sample_link.send_message(Msg::WatchSample(sample)),
            move |err| error_link.send_message(Msg::PositionFailed(err)),
        ) {
            Ok(()) => true,
            Err(err) => {
                log::warn!("{}", err);
                self.status = err;
                false
            }
        }
    }
}

impl Component for GameView {
    type Message = Msg;
    type Properties = GameProps;

    fn create(ctx: &Context<Self>) -> Self {
        let props = ctx.props();
        let config = game::GameConfig::new(
            props.goal.unwrap_or(game::GameConfig::DEFAULT_GOAL),
            game::GameConfig::DEFAULT_RADIUS,
            props.seed.unwrap_or(0),
        );

        let world = match SaveSlot::load() {
            Some(text) => match game::SaveBlob::from_json(&text, &config) {
                Ok(blob) => {
                    log::info!("restored save, format v{}", blob.version);
                    blob.restore(config)
                }
                Err(err) => {
                    log::warn!("ignoring stored save: {}", err);
                    game::GameWorld::new(config)
                }
            },
            None => game::GameWorld::new(config),
        };

        Self {
            world,
            status: "welcome".to_owned(),
            debounce: game::Debounce::default(),
            save_timer: None,
            watcher: GeoWatcher::new(),
        }
    }

    fn rendered(&mut self, ctx: &Context<Self>, first_render: bool) {
        // a save can come back with follow still enabled
        if first_render && self.world.follow_enabled() && !self.start_watch(ctx) {
            self.world.set_follow_enabled(false);
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        use Msg::*;

        match msg {
            CellClicked(cell) => {
                let outcome = self.world.click_cell(cell);
                self.status = outcome_status(outcome);
                if outcome.has_update() {
                    self.schedule_save(ctx);
                }
                true
            }
            Step(drow, dcol) => {
                if self.world.movement_mode() != game::MovementMode::Stepped {
                    return false;
                }
                if self.world.step(drow, dcol).has_update() {
                    self.schedule_save(ctx);
                }
                true
            }
            UseKeys => {
                if self.world.movement_mode() == game::MovementMode::Stepped {
                    return false;
                }
                self.watcher.stop();
                self.world.set_follow_enabled(false);
                // switching modes never moves the player
                self.world.set_movement_mode(game::MovementMode::Stepped);
                self.schedule_save(ctx);
                true
            }
            ToggleFollow => {
                if self.world.follow_enabled() {
                    self.watcher.stop();
                    self.world.set_follow_enabled(false);
                    self.status = "follow off".to_owned();
                } else if self.start_watch(ctx) {
                    self.world.set_follow_enabled(true);
                    self.world.set_movement_mode(game::MovementMode::Sampled);
                    self.status = "following position".to_owned();
                }
                self.schedule_save(ctx);
                true
            }
            SnapToPosition => {
                let sample_link = ctx.link().clone();
                let error_link = ctx.link().clone();
                GeoWatcher::request_once(
                    move |sample| sample_link.send_message(Msg::Snapped(sample)),
                    move |err| error_link.send_message(Msg::PositionFailed(err)),
                );
                self.status = "locating...".to_owned();
                true
            }
            WatchSample(sample) => {
                // follow may have been disabled while this sample was queued
                if !self.world.follow_enabled()
                    || self.world.movement_mode() != game::MovementMode::Sampled
                {
                    return false;
                }
                if self.world.apply_sample(sample).has_update() {
                    self.schedule_save(ctx);
                    true
                } else {
                    false
                }
            }
            Snapped(sample) => {
                if self.world.apply_sample(sample).has_update() {
                    self.schedule_save(ctx);
                }
                self.status = "snapped to current position".to_owned();
                true
            }
            PositionFailed(err) => {
                // never stall silently in a "tracking" state with no updates
                self.watcher.stop();
                let was_following = self.world.follow_enabled();
                self.world.set_follow_enabled(false);
                if was_following {
                    self.schedule_save(ctx);
                }
                log::warn!("{}", err);
                self.status = err;
                true
            }
            AutosaveFired => {
                self.save_timer = None;
                if self.debounce.fire() {
                    // always the latest state, never the scheduling-time state
                    SaveSlot::store(&game::SaveBlob::capture(&self.world).to_json());
                    log::debug!("autosaved, {} overlay entries", self.world.overlay_len());
                }
                false
            }
            NewGame => {
                self.watcher.stop();
                self.save_timer = None;
                self.debounce.cancel();
                SaveSlot::clear();
                self.world.new_game();
                self.status = "new game".to_owned();
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        use Msg::*;

        let model = self.world.render_model(self.viewport(), &self.status);
        // margin included: VIEW_RADIUS + 1 on each side of the player
        let width = (2 * (VIEW_RADIUS + 1) + 1) as usize;
        let player_cell = model.hud.player_cell;
        let cell_cb = ctx.link().callback(CellClicked);

        let onkeydown = ctx.link().batch_callback(|e: KeyboardEvent| {
            let step = match e.key().as_str() {
                "ArrowUp" | "w" => Some((1, 0)),
                "ArrowDown" | "s" => Some((-1, 0)),
                "ArrowLeft" | "a" => Some((0, -1)),
                "ArrowRight" | "d" => Some((0, 1)),
                _ => None,
            };
            step.map(|(drow, dcol)| {
                e.prevent_default();
                Step(drow, dcol)
            })
        });

        let stepped = self.world.movement_mode() == game::MovementMode::Stepped;
        let following = self.world.follow_enabled();
        let cb_new_game = ctx.link().callback(|e: MouseEvent| {
            e.stop_propagation();
            NewGame
        });

        html! {
            <div class="geomerge" tabindex="0" {onkeydown}>
                <nav>
                    <aside>{format!("hand: {}", token_label(model.hud.held))}</aside>
                    <span><button onclick={cb_new_game}>{"new game"}</button></span>
                    <aside>{format!("goal: {}", model.hud.goal)}</aside>
                </nav>
                <p class="status">
                    {format!("{:?} {}", player_cell, model.hud.status)}
                </p>
                <table>
                    {
                        // highest row at the top: north up
                        for model.cells.chunks(width).rev().map(|row| html! {
                            <tr>
                                {
                                    for row.iter().map(|&view| {
                                        html! {
                                            <CellTile
                                                {view}
                                                is_player={view.cell == player_cell}
                                                callback={cell_cb.clone()}
                                            />
                                        }
                                    })
                                }
                            </tr>
                        })
                    }
                </table>
                <footer>
                    <span class="steps">
                        <button disabled={!stepped} onclick={ctx.link().callback(|_| Step(1, 0))}>{"⬆"}</button>
                        <button disabled={!stepped} onclick={ctx.link().callback(|_| Step(-1, 0))}>{"⬇"}</button>
                        <button disabled={!stepped} onclick={ctx.link().callback(|_| Step(0, -1))}>{"⬅"}</button>
                        <button disabled={!stepped} onclick={ctx.link().callback(|_| Step(0, 1))}>{"➡"}</button>
                    </span>
                    <span class="modes">
                        <button
                            disabled={stepped}
                            onclick={ctx.link().callback(|_| UseKeys)}
                        >{"keys"}</button>
                        <button
                            disabled={following}
                            onclick={ctx.link().callback(|_| ToggleFollow)}
                        >{"follow"}</button>
                        <button
                            disabled={!following}
                            onclick={ctx.link().callback(|_| ToggleFollow)}
                        >{"stop"}</button>
                        <button onclick={ctx.link().callback(|_| SnapToPosition)}>{"snap"}</button>
                    </span>
                </footer>
            </div>
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_slot_uses_versioned_namespace() {
        assert_eq!(SaveSlot::KEY, "geomerge:save:v2");
    }

    #[test]
    fn outcome_status_names_every_outcome() {
        use game::ClickOutcome::*;
        assert_eq!(outcome_status(TooFar), "too far away");
        assert_eq!(outcome_status(NothingToPickUp), "nothing to pick up");
        assert_eq!(outcome_status(Incompatible), "tokens don't match");
        assert_eq!(
            outcome_status(PickedUp {
                value: 4,
                goal_reached: false
            }),
            "picked up 4"
        );
        assert_eq!(outcome_status(Placed { value: 4 }), "placed 4");
        assert_eq!(
            outcome_status(Merged {
                value: 32,
                goal_reached: true
            }),
            "merged into 32, goal reached!"
        );
    }

    #[test]
    fn returning_to_keys_disables_follow_without_moving() {
        let mut world = game::GameWorld::new(game::GameConfig::default());
        world.set_movement_mode(game::MovementMode::Sampled);
        world.set_follow_enabled(true);
        world.apply_sample(game::GeoSample {
            lat: 0.000_35,
            lng: 0.000_35,
            accuracy: 8.0,
        });

        // the same sequence the "keys" control drives through the world
        world.set_follow_enabled(false);
        world.set_movement_mode(game::MovementMode::Stepped);

        assert_eq!(world.movement_mode(), game::MovementMode::Stepped);
        assert!(!world.follow_enabled());
        assert_eq!(world.player_cell(), (3, 3));
    }

    #[test]
    fn viewport_spans_the_player_square() {
        let world = game::GameWorld::new(game::GameConfig::default());
        let view = GameView {
            world,
            status: String::new(),
            debounce: game::Debounce::default(),
            save_timer: None,
            watcher: GeoWatcher::new(),
        };
        let rect = view.viewport();
        assert_eq!(game::to_cell(rect.min_lat, rect.min_lng), (-VIEW_RADIUS, -VIEW_RADIUS));
        // both corners land inside the outermost visible cells
        assert_eq!(
            game::to_cell(rect.max_lat, rect.max_lng),
            (VIEW_RADIUS, VIEW_RADIUS)
        );
    }
}
