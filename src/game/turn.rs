//! # Turn Engine
//!
//! One tick of the game: the player acts, every monster answers, and the
//! player may level up.

use crate::game::{GameSession, GameStatus, MessageTone, Position};
use crate::input::{menu, Frontend, Intent};
use crate::DelveResult;
use log::{debug, info};

/// Times the level-up menu is shown before constitution is picked for the
/// player.
pub const LEVEL_UP_PROMPTS: usize = 5;

/// What resolving a player intent amounted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerAction {
    /// Time passes; monsters get to act
    TookTurn,
    /// Nothing happened, or only something free happened
    DidntTakeTurn,
    /// The player asked to leave
    Exit,
}

/// How a call to [`GameSession::run`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Ticks processed by this run
    pub ticks: u64,
    /// Whether the frontend asked to quit, as opposed to hitting the tick cap
    pub quit: bool,
    pub status: GameStatus,
    pub depth: u32,
    pub player_level: u32,
}

impl GameSession {
    /// Processes one intent from the frontend and everything it triggers.
    ///
    /// # Examples
    ///
    /// ```
    /// use delve::{GameConfig, GameSession, Intent, PlayerAction, ScriptedFrontend};
    ///
    /// let mut session = GameSession::new(GameConfig::default(), 1).unwrap();
    /// let mut frontend = ScriptedFrontend::new().with_intents([Intent::Cancel, Intent::Quit]);
    /// assert_eq!(session.play_tick(&mut frontend).unwrap(), PlayerAction::DidntTakeTurn);
    /// assert_eq!(session.play_tick(&mut frontend).unwrap(), PlayerAction::Exit);
    /// ```
    pub fn play_tick(&mut self, frontend: &mut dyn Frontend) -> DelveResult<PlayerAction> {
        self.refresh_visibility();
        let intent = frontend.next_intent(self);

        if self.status == GameStatus::Dead {
            return Ok(match intent {
                Intent::Quit => PlayerAction::Exit,
                Intent::ShowCharacterSheet => {
                    self.show_character_sheet(frontend);
                    PlayerAction::DidntTakeTurn
                }
                _ => PlayerAction::DidntTakeTurn,
            });
        }

        let action = self.handle_intent(intent, frontend)?;
        self.refresh_visibility();

        if action == PlayerAction::TookTurn {
            self.turn += 1;
            self.run_monster_turns();
        }
        if self.status == GameStatus::Playing {
            self.check_level_up(frontend)?;
        }
        Ok(action)
    }

    /// Resolves a single intent for the player.
    pub fn handle_intent(
        &mut self,
        intent: Intent,
        frontend: &mut dyn Frontend,
    ) -> DelveResult<PlayerAction> {
        debug!("Player intent {:?}", intent);
        let action = match intent {
            Intent::Move(direction) => {
                let delta = direction.to_delta();
                self.player_move_or_attack(delta.x, delta.y)
            }
            Intent::PickUp => self.pick_up_here(),
            Intent::UseItem => {
                let header = "Press the key next to an item to use it, or any other to cancel.";
                match self.inventory_menu(header, frontend)? {
                    Some(slot) => self.use_item(slot, frontend),
                    None => PlayerAction::DidntTakeTurn,
                }
            }
            Intent::DropItem => {
                let header = "Press the key next to an item to drop it, or any other to cancel.";
                match self.inventory_menu(header, frontend)? {
                    Some(slot) if self.drop_item(slot) => PlayerAction::TookTurn,
                    _ => PlayerAction::DidntTakeTurn,
                }
            }
            Intent::Descend => {
                if self.player_position() == self.level.stairs {
                    self.next_level()?;
                } else {
                    self.message("There are no stairs here.", MessageTone::Info);
                }
                PlayerAction::DidntTakeTurn
            }
            Intent::ShowCharacterSheet => {
                self.show_character_sheet(frontend);
                PlayerAction::DidntTakeTurn
            }
            Intent::ToggleFullMapReveal => {
                let revealed = self.visibility.toggle_reveal();
                debug!("Full map reveal {}", if revealed { "on" } else { "off" });
                PlayerAction::DidntTakeTurn
            }
            Intent::Cancel => PlayerAction::DidntTakeTurn,
            Intent::Quit => PlayerAction::Exit,
        };
        Ok(action)
    }

    /// Attacks a fighter in the way or steps into the free tile.
    ///
    /// A move into a wall or a non-fighting blocker costs nothing.
    pub fn player_move_or_attack(&mut self, dx: i32, dy: i32) -> PlayerAction {
        let player = self.player;
        let target_pos = self.player_position() + Position::new(dx, dy);

        if let Some(target) = self.fighter_at(target_pos).filter(|&id| id != player) {
            self.attack(player, target);
            return PlayerAction::TookTurn;
        }

        if self.move_by(player, dx, dy) {
            self.stats.steps_taken += 1;
            PlayerAction::TookTurn
        } else {
            PlayerAction::DidntTakeTurn
        }
    }

    /// Picks up the first item under the player.
    fn pick_up_here(&mut self) -> PlayerAction {
        match self.item_at(self.player_position()) {
            Some(item) if self.pick_up(item) => PlayerAction::TookTurn,
            _ => PlayerAction::DidntTakeTurn,
        }
    }

    /// Lets every monster act once, in collection order.
    pub fn run_monster_turns(&mut self) {
        let order: Vec<_> = self.objects.clone();
        for id in order {
            if self.status == GameStatus::Dead {
                break;
            }
            if id == self.player {
                continue;
            }
            let Some(ai) = self.entity_mut(id).and_then(|entity| entity.ai.take()) else {
                continue;
            };
            let next = ai.take_turn(id, self);
            if let Some(entity) = self.entity_mut(id) {
                if entity.fighter.is_some() && entity.ai.is_none() {
                    entity.ai = Some(next);
                }
            }
        }
    }

    /// Experience needed for the next character level.
    pub fn xp_to_next_level(&self) -> i32 {
        self.config.rules.level_up_threshold(self.player_level)
    }

    /// Raises the character level once if the player has enough experience.
    /// Returns whether a level was gained.
    ///
    /// The stat menu is re-shown on a cancel, up to [`LEVEL_UP_PROMPTS`]
    /// times, after which constitution is raised.
    pub fn check_level_up(&mut self, frontend: &mut dyn Frontend) -> DelveResult<bool> {
        let threshold = self.xp_to_next_level();
        let player = self.player;
        let Some(fighter) = self
            .entity_mut(player)
            .and_then(|entity| entity.fighter.as_mut())
        else {
            return Ok(false);
        };
        if fighter.xp < threshold {
            return Ok(false);
        }
        fighter.xp -= threshold;
        let options = vec![
            format!("Constitution (+20 HP, from {})", fighter.max_hp),
            format!("Strength (+1 attack, from {})", fighter.power),
            format!("Agility (+1 defense, from {})", fighter.defense),
        ];

        self.player_level += 1;
        info!("Player reached level {}", self.player_level);
        self.message(
            format!(
                "Your battle skills grow stronger! You reached level {}!",
                self.player_level
            ),
            MessageTone::Warning,
        );

        let mut choice = None;
        for _ in 0..LEVEL_UP_PROMPTS {
            choice = menu(frontend, "Level up! Choose a stat to raise:", &options)?;
            if choice.is_some() {
                break;
            }
        }
        let choice = choice.unwrap_or_else(|| {
            debug!("No stat chosen, raising constitution");
            0
        });
        if let Some(fighter) = self
            .entity_mut(player)
            .and_then(|entity| entity.fighter.as_mut())
        {
            match choice {
                0 => {
                    fighter.max_hp += 20;
                    fighter.hp += 20;
                }
                1 => fighter.power += 1,
                _ => fighter.defense += 1,
            }
        }
        Ok(true)
    }

    /// Text of the character information box.
    pub fn character_sheet(&self) -> String {
        let (xp, max_hp, power, defense) = self
            .player_fighter()
            .map(|f| (f.xp, f.max_hp, f.power, f.defense))
            .unwrap_or_default();
        format!(
            "Character information\n\nLevel: {}\nExperience: {}\nExperience to level up: {}\n\nMaximum HP: {}\nAttack: {}\nDefense: {}",
            self.player_level,
            xp,
            self.xp_to_next_level(),
            max_hp,
            power,
            defense
        )
    }

    fn show_character_sheet(&self, frontend: &mut dyn Frontend) {
        frontend.prompt_choice(&self.character_sheet(), &[]);
    }

    /// Plays ticks until the frontend quits or `max_ticks` have passed.
    pub fn run(
        &mut self,
        frontend: &mut dyn Frontend,
        max_ticks: Option<u64>,
    ) -> DelveResult<RunSummary> {
        let mut ticks = 0;
        let mut quit = false;
        while max_ticks.map_or(true, |limit| ticks < limit) {
            ticks += 1;
            if self.play_tick(frontend)? == PlayerAction::Exit {
                quit = true;
                break;
            }
        }
        Ok(RunSummary {
            ticks,
            quit,
            status: self.status,
            depth: self.depth,
            player_level: self.player_level,
        })
    }
}
