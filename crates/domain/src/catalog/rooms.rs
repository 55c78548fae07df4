//! The shipped rooms.
//!
//! Layout: the Nexus is the hub. Archive to the west, Sanctum to the east,
//! Refinery through the north-west door, the Core through the north door and
//! the Entrance to the south.

use crate::entities::{Exit, Npc, NpcRole, Room, Tile};
use crate::ids::RoomId;
use crate::value_objects::GridPos;

const WIDTH: u32 = 15;
const HEIGHT: u32 = 11;

fn pos(x: i32, y: i32) -> GridPos {
    GridPos::new(x, y)
}

pub fn shipped_rooms() -> Vec<Room> {
    vec![entrance(), nexus(), archive(), refinery(), sanctum(), core()]
}

fn entrance() -> Room {
    Room::bordered(RoomId::Entrance, "Entrance", WIDTH, HEIGHT)
        .with_exit(Exit::new(pos(7, 0), RoomId::Nexus, pos(7, 9)))
}

fn nexus() -> Room {
    Room::bordered(RoomId::Nexus, "The Nexus", WIDTH, HEIGHT)
        .with_npc(
            Npc::new("epoch", "Epoch", NpcRole::Guide, pos(7, 5))
                .with_portrait("epoch")
                .with_dialogue([
                    "Welcome to the Nexus, Optimizer.",
                    "This is the central hub of the DSPy Proving Grounds.",
                    "To unlock the Core (North), you must gather wisdom from the three Masters.",
                    "Master Bootstrap is in the Archive (West).",
                    "Master Mipro is in the Refinery (North-West).",
                    "Master Bayes is in the Sanctum (East).",
                    "Good luck.",
                ]),
        )
        .with_exit(Exit::new(pos(0, 5), RoomId::Archive, pos(13, 5)))
        .with_exit(Exit::new(pos(14, 5), RoomId::Sanctum, pos(1, 5)))
        .with_exit(Exit::new(pos(3, 0), RoomId::Refinery, pos(7, 9)))
        .with_exit(Exit::new(pos(7, 0), RoomId::Core, pos(7, 9)))
        .with_exit(Exit::new(pos(7, 10), RoomId::Entrance, pos(7, 5)))
}

fn archive() -> Room {
    Room::bordered(RoomId::Archive, "Archive of Examples", WIDTH, HEIGHT)
        .with_npc(
            Npc::new("elder_bootstrap", "Master Bootstrap", NpcRole::Elder, pos(2, 5))
                .with_portrait("bootstrap")
                .with_wisdom("BootstrapFewShot")
                .with_dialogue([
                    "Welcome to the Archive.",
                    "I am Master Bootstrap. I learn from successful examples of the past.",
                    "*You have learned the way of BootstrapFewShot*",
                ]),
        )
        .with_exit(Exit::new(pos(14, 5), RoomId::Nexus, pos(1, 5)))
}

fn refinery() -> Room {
    Room::bordered(RoomId::Refinery, "Hall of Refinement", WIDTH, HEIGHT)
        .with_npc(
            Npc::new("elder_mipro", "Master Mipro", NpcRole::Elder, pos(7, 2))
                .with_portrait("mipro")
                .with_wisdom("MIPRO")
                .with_dialogue([
                    "This is the Refinery!",
                    "I am Master Mipro. We test everything here!",
                    "Instructions, examples... we generate variants and score them.",
                    "Only the best survive the optimization process!",
                    "*You have learned the way of MIPRO*",
                ]),
        )
        .with_exit(Exit::new(pos(7, 10), RoomId::Nexus, pos(3, 1)))
}

fn sanctum() -> Room {
    Room::bordered(RoomId::Sanctum, "Sanctum of Probability", WIDTH, HEIGHT)
        .with_npc(
            Npc::new("elder_bayes", "Master Bayes", NpcRole::Elder, pos(12, 5))
                .with_portrait("bayes")
                .with_wisdom("BayesianOptimization")
                .with_dialogue([
                    "Enter the void...",
                    "I am Master Bayes. I see the unseen connections.",
                    "We do not guess. We model the probability of success.",
                    "Let the data guide your search through the infinite.",
                    "*You have learned the way of Bayesian Optimization*",
                ]),
        )
        .with_exit(Exit::new(pos(0, 5), RoomId::Nexus, pos(13, 5)))
}

fn core() -> Room {
    Room::bordered(RoomId::Core, "The Core", WIDTH, HEIGHT)
        .with_tile(pos(7, 2), Tile::Terminal)
        .with_npc(
            Npc::new("core_terminal", "DSPy Core Terminal", NpcRole::Computer, pos(7, 2))
                .with_sprite("computer")
                .with_portrait("epoch")
                .with_dialogue([
                    "DSPy CORE SYSTEM ONLINE.",
                    "Insert the three Wisdom Keys to begin Final Optimization.",
                    "...",
                ]),
        )
        .with_exit(Exit::new(pos(7, 10), RoomId::Nexus, pos(7, 1)))
}
