pub mod color_fill;
pub mod scavenger;

pub struct GameDescriptor
{
    pub name: &'static str,
    pub description: &'static str,
}

pub fn registry() -> Vec<GameDescriptor>
{
    vec![GameDescriptor {
        name: "fill",
        description: "Colour fill puzzle: no two neighbours share a colour",
    },
    GameDescriptor {
        name: "scavenger",
        description: "Dodge asteroids, collect crystals, level up",
    }]
}

pub fn find(name: &str) -> Option<GameDescriptor>
{
    registry()
        .into_iter()
        .find(|game| game.name.eq_ignore_ascii_case(name))
}
