//! Built-in sample rows for the `game_sales` and `reviews` tables.
//!
//! Decimal columns are given as literals so their scale is kept exactly.

/// (game, platform, publisher, developer, games_sold, year)
pub type SalesRecord = (
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    i32,
);

/// (game, critic_score, user_score)
pub type ReviewRecord = (&'static str, Option<&'static str>, Option<&'static str>);

pub const GAME_SALES: &[SalesRecord] = &[
    ("Neon Kingdom", "NES", "Electronic Arts", "Sunward", "1.48", 1982),
    ("Iron Quest", "NES", "Square Enix", "Blue Meridian", "7.98", 1985),
    ("Lunar Legion", "2600", "Capcom", "Hollow Peak", "4.89", 1985),
    ("Silent Meridian", "NES", "Nintendo", "Ironbark", "1.93", 1985),
    ("Frozen Meridian", "2600", "Sony Computer Entertainment", "Lakeside Studio", "1.71", 1985),
    ("Twilight Rally III", "SNES", "Nintendo", "Sunward", "40.24", 1990),
    ("Scarlet Rally", "SNES", "Square Enix", "Moonstone", "12.31", 1990),
    ("Silent Citadel III", "SNES", "Electronic Arts", "Lakeside Studio", "6.43", 1992),
    ("Burning Kingdom", "GEN", "Activision", "Copperline", "12.19", 1992),
    ("Savage Express", "GB", "Ubisoft", "Northgate Games", "4.2", 1992),
    ("Lunar Chronicle II", "SNES", "Activision", "Blue Meridian", "29.02", 1993),
    ("Endless Meridian", "GEN", "Ubisoft", "Hollow Peak", "13.17", 1993),
    ("Last Garden", "SNES", "Take-Two Interactive", "Copperline", "9.25", 1993),
    ("Ancient Vanguard III", "SNES", "Square Enix", "Tallgrass", "5.49", 1995),
    ("Iron Rally", "GEN", "Capcom", "Moonstone", "10.63", 1995),
    ("Phantom Echoes", "GB", "Sega", "Kestrel Labs", "6.39", 1995),
    ("Velvet Meridian Online", "SNES", "Take-Two Interactive", "Lakeside Studio", "3.87", 1995),
    ("Silent Outpost Origins", "PS", "Capcom", "Lakeside Studio", "23.10", 1996),
    ("Cobalt Quest", "N64", "Sega", "Copperline", "7.67", 1996),
    ("Velvet Garden", "PC", "Take-Two Interactive", "Northgate Games", "9.84", 1996),
    ("Iron Quest Deluxe", "PS", "Bandai Namco", "Blue Meridian", "10.2", 1996),
    ("Endless Outpost Zero", "N64", "Nintendo", "Hollow Peak", "6.84", 1996),
    ("Twilight Odyssey Online", "PS", "Sony Computer Entertainment", "Hollow Peak", "7.6", 1996),
    ("Crimson Odyssey", "N64", "Electronic Arts", "Kestrel Labs", "13.01", 1996),
    ("Wild Horizon", "PS", "Sega", "Blue Meridian", "10.66", 1997),
    ("Iron Circuit", "N64", "Take-Two Interactive", "Hollow Peak", "11.75", 1997),
    ("Hollow Kingdom", "PC", "Bandai Namco", "Ironbark", "11.76", 1997),
    ("Hollow Voyage", "PS", "Nintendo", "Sunward", "7.84", 1997),
    ("Rusty Horizon", "N64", "Sony Computer Entertainment", "Quiet Harbor", "3.59", 1997),
    ("Iron Circuit Zero", "PC", "Electronic Arts", "Redfern Works", "5.27", 1997),
    ("Crimson Garden", "PS", "Activision", "Tallgrass", "4.23", 1997),
    ("Hollow Vanguard Online", "N64", "Ubisoft", "Moonstone", "11.44", 1997),
    ("Sacred Legion", "PS", "Take-Two Interactive", "Sunward", "33.15", 1998),
    ("Hidden Garden", "N64", "Bandai Namco", "Quiet Harbor", "6.46", 1998),
    ("Last Meridian", "PC", "Nintendo", "Redfern Works", "9.04", 1998),
    ("Golden Frontier", "PS", "Sony Computer Entertainment", "Tallgrass", "6.39", 1998),
    ("Hidden Harbor", "N64", "Electronic Arts", "Moonstone", "9.69", 1998),
    ("Hidden Dynasty", "PC", "Activision", "Kestrel Labs", "6.51", 1998),
    ("Silver Tides", "PS", "Ubisoft", "Lakeside Studio", "7.05", 1998),
    ("Scarlet Orbit", "N64", "Square Enix", "Copperline", "10.14", 1998),
    ("Ancient Garden Online", "PC", "Capcom", "Northgate Games", "9.21", 1998),
    ("Shadow Garden", "PS", "Sega", "Blue Meridian", "7.01", 1998),
    ("Hidden Tactics", "PS", "Activision", "Sunward", "5.92", 1998),
    ("Shadow Quest", "N64", "Ubisoft", "Copperline", "11.07", 1998),
    ("Thunder Harbor", "PS", "Bandai Namco", "Tallgrass", "6.6", 1999),
    ("Scarlet Saga Deluxe", "N64", "Nintendo", "Moonstone", "11.11", 1999),
    ("Ancient Circuit", "PC", "Sony Computer Entertainment", "Kestrel Labs", "5.06", 1999),
    ("Thunder Express", "PS", "Electronic Arts", "Lakeside Studio", "7.25", 1999),
    ("Scarlet Citadel", "N64", "Activision", "Copperline", "4.49", 1999),
    ("Cobalt Citadel", "PC", "Ubisoft", "Northgate Games", "5.14", 1999),
    ("Sacred Harbor", "PS", "Nintendo", "Lakeside Studio", "20.61", 2000),
    ("Shadow Orbit Origins", "N64", "Sony Computer Entertainment", "Copperline", "7.55", 2000),
    ("Distant Run", "PC", "Electronic Arts", "Northgate Games", "7.65", 2000),
    ("Ancient Meridian III", "PS", "Activision", "Blue Meridian", "10.12", 2000),
    ("Last Echoes Origins", "N64", "Ubisoft", "Hollow Peak", "12.99", 2000),
    ("Twilight Harbor", "PS", "Square Enix", "Redfern Works", "13.87", 2000),
    ("Hidden Horizon", "PS2", "Sony Computer Entertainment", "Blue Meridian", "4.58", 2001),
    ("Shadow Circuit", "XB", "Electronic Arts", "Hollow Peak", "13.52", 2001),
    ("Neon Meridian", "GC", "Activision", "Ironbark", "8.6", 2001),
    ("Distant Horizon", "GBA", "Ubisoft", "Sunward", "2.23", 2001),
    ("Sacred Circuit III", "PS2", "Square Enix", "Quiet Harbor", "1.06", 2001),
    ("Rusty Dynasty Origins", "PS2", "Electronic Arts", "Sunward", "24.67", 2002),
    ("Crimson Harbor", "XB", "Activision", "Quiet Harbor", "17.25", 2002),
    ("Hidden Crown", "GC", "Ubisoft", "Redfern Works", "13.76", 2002),
    ("Burning Saga III", "GBA", "Square Enix", "Tallgrass", "13.00", 2002),
    ("Hollow Tides III", "PS2", "Capcom", "Moonstone", "16.82", 2002),
    ("Neon Orbit", "XB", "Sega", "Kestrel Labs", "13.71", 2002),
    ("Silent Tactics", "GC", "Take-Two Interactive", "Lakeside Studio", "15.94", 2002),
    ("Rusty Rally", "GBA", "Bandai Namco", "Copperline", "16.33", 2002),
    ("Burning Quest", "GBA", "Sega", "Moonstone", "10.77", 2002),
    ("Broken Express Origins", "PS2", "Take-Two Interactive", "Ironbark", "0.88", 2002),
    ("Broken Garden", "PS2", "Activision", "Tallgrass", "2.96", 2003),
    ("Thunder Legion", "XB", "Ubisoft", "Moonstone", "11.11", 2003),
    ("Emerald Express", "GC", "Square Enix", "Kestrel Labs", "2.67", 2003),
    ("Phantom Express III", "GBA", "Capcom", "Lakeside Studio", "6.17", 2003),
    ("Silent Rebellion Online", "PS2", "Sega", "Copperline", "12", 2003),
    ("Crimson Rebellion", "XB", "Take-Two Interactive", "Northgate Games", "1.79", 2003),
    ("Last Voyage Origins", "PS2", "Ubisoft", "Lakeside Studio", "21.82", 2004),
    ("Cobalt Garden", "XB", "Square Enix", "Copperline", "5.57", 2004),
    ("Endless Crown", "GC", "Capcom", "Northgate Games", "5.81", 2004),
    ("Radiant Express", "GBA", "Sega", "Blue Meridian", "4.64", 2004),
    ("Twilight Odyssey II", "PS2", "Take-Two Interactive", "Hollow Peak", "8.53", 2004),
    ("Distant Echoes III", "XB", "Bandai Namco", "Ironbark", "9.27", 2004),
    ("Iron Tides", "GBA", "Bandai Namco", "Lakeside Studio", "3", 2004),
    ("Phantom Rebellion Zero", "PS2", "Nintendo", "Quiet Harbor", "13.67", 2004),
    ("Phantom Kingdom", "PS2", "Square Enix", "Blue Meridian", "4.99", 2005),
    ("Sacred Frontier", "XB", "Capcom", "Hollow Peak", "10.47", 2005),
    ("Golden Outpost", "GC", "Sega", "Ironbark", "3.8", 2005),
    ("Endless Reckoning", "GBA", "Take-Two Interactive", "Sunward", "8.77", 2005),
    ("Neon Reckoning Deluxe", "PS2", "Bandai Namco", "Quiet Harbor", "2.38", 2005),
    ("Sacred Dynasty Origins", "GBA", "Nintendo", "Copperline", "9.89", 2005),
    ("Distant Voyage Deluxe", "PS2", "Sony Computer Entertainment", "Redfern Works", "11.09", 2005),
    ("Wii Sports", "Wii", "Nintendo", "Nintendo EAD", "82.90", 2006),
    ("Phantom Rebellion III", "X360", "Sega", "Quiet Harbor", "9.14", 2006),
    ("Silver Outpost", "PS3", "Take-Two Interactive", "Redfern Works", "5.79", 2006),
    ("Wild Kingdom", "DS", "Bandai Namco", "Tallgrass", "11.04", 2006),
    ("Lunar Garden", "Wii", "Nintendo", "Moonstone", "2.33", 2006),
    ("Hollow Legion", "X360", "Sony Computer Entertainment", "Kestrel Labs", "4.25", 2006),
    ("Burning Meridian II", "PS3", "Electronic Arts", "Lakeside Studio", "13.49", 2006),
    ("Iron Run Origins", "DS", "Sony Computer Entertainment", "Northgate Games", "5.05", 2006),
    ("Iron Orbit", "Wii", "Electronic Arts", "Tallgrass", "9.79", 2006),
    ("Crimson Echoes", "X360", "Activision", "Hollow Peak", "9.05", 2006),
    ("Frozen Frontier", "Wii", "Sega", "Tallgrass", "5.86", 2007),
    ("Silent Circuit Deluxe", "X360", "Take-Two Interactive", "Moonstone", "13.37", 2007),
    ("Savage Crown", "PS3", "Bandai Namco", "Kestrel Labs", "6.43", 2007),
    ("Distant Crown", "DS", "Nintendo", "Lakeside Studio", "6.04", 2007),
    ("Ancient Run Deluxe", "Wii", "Sony Computer Entertainment", "Copperline", "1.25", 2007),
    ("Thunder Tides", "X360", "Electronic Arts", "Northgate Games", "5.53", 2007),
    ("Radiant Odyssey Zero", "PS3", "Activision", "Blue Meridian", "9.35", 2007),
    ("Rusty Garden", "DS", "Ubisoft", "Hollow Peak", "8.55", 2007),
    ("Broken Horizon", "Wii", "Take-Two Interactive", "Lakeside Studio", "35.57", 2008),
    ("Twilight Kingdom Zero", "X360", "Bandai Namco", "Copperline", "15.71", 2008),
    ("Burning Circuit Zero", "PS3", "Nintendo", "Northgate Games", "16.57", 2008),
    ("Silver Crown", "DS", "Sony Computer Entertainment", "Blue Meridian", "15.89", 2008),
    ("Velvet Citadel", "Wii", "Electronic Arts", "Hollow Peak", "14.28", 2008),
    ("Distant Circuit Online", "X360", "Activision", "Ironbark", "13.99", 2008),
    ("Hollow Dynasty", "PS3", "Ubisoft", "Sunward", "17.70", 2008),
    ("Neon Citadel Deluxe", "DS", "Square Enix", "Quiet Harbor", "15.46", 2008),
    ("Ancient Circuit Online", "Wii", "Capcom", "Redfern Works", "14.54", 2008),
    ("Shadow Orbit", "X360", "Sega", "Tallgrass", "15.36", 2008),
    ("Frozen Crown", "DS", "Activision", "Hollow Peak", "2.36", 2008),
    ("Hollow Quest Online", "Wii", "Ubisoft", "Kestrel Labs", "12.51", 2008),
    ("Silent Horizon Deluxe", "X360", "Square Enix", "Sunward", "13.39", 2008),
    ("Phantom Voyage", "Wii", "Bandai Namco", "Blue Meridian", "28.31", 2009),
    ("Wild Rebellion", "X360", "Nintendo", "Hollow Peak", "10.62", 2009),
    ("Broken Vanguard", "PS3", "Sony Computer Entertainment", "Ironbark", "13.67", 2009),
    ("Broken Legion", "DS", "Electronic Arts", "Sunward", "11", 2009),
    ("Scarlet Reckoning", "Wii", "Activision", "Quiet Harbor", "10.85", 2009),
    ("Broken Crown", "X360", "Ubisoft", "Redfern Works", "12.14", 2009),
    ("Twilight Quest", "DS", "Ubisoft", "Ironbark", "12.46", 2009),
    ("Cobalt Voyage", "Wii", "Square Enix", "Lakeside Studio", "13.66", 2009),
    ("Scarlet Dynasty", "Wii", "Nintendo", "Sunward", "8.21", 2010),
    ("Twilight Odyssey", "X360", "Sony Computer Entertainment", "Quiet Harbor", "13.35", 2010),
    ("Crimson Chronicle", "PS3", "Electronic Arts", "Redfern Works", "5.5", 2010),
    ("Shadow Orbit II", "DS", "Activision", "Tallgrass", "10.8", 2010),
    ("Phantom Express Origins", "Wii", "Ubisoft", "Moonstone", "1.85", 2010),
    ("Sacred Tactics", "X360", "Square Enix", "Kestrel Labs", "2.02", 2010),
    ("Silver Orbit III", "PS3", "Capcom", "Lakeside Studio", "5.22", 2010),
    ("Silver Horizon Zero", "Wii", "Sony Computer Entertainment", "Tallgrass", "30.26", 2011),
    ("Feral Legion", "X360", "Electronic Arts", "Moonstone", "13.66", 2011),
    ("Endless Vanguard", "PS3", "Activision", "Kestrel Labs", "3.23", 2011),
    ("Crimson Garden Deluxe", "DS", "Ubisoft", "Lakeside Studio", "2.53", 2011),
    ("Endless Tides", "Wii", "Square Enix", "Copperline", "6.45", 2011),
    ("Endless Crown Online", "DS", "Capcom", "Quiet Harbor", "10.05", 2011),
    ("Feral Frontier", "Wii", "Sega", "Northgate Games", "11.74", 2011),
    ("Crimson Vanguard", "Wii", "Electronic Arts", "Lakeside Studio", "10.87", 2012),
    ("Distant Orbit", "X360", "Activision", "Copperline", "4.81", 2012),
    ("Iron Rally Zero", "PS3", "Ubisoft", "Northgate Games", "11.23", 2012),
    ("Hollow Dynasty Zero", "DS", "Square Enix", "Blue Meridian", "10.91", 2012),
    ("Hollow Frontier", "Wii", "Capcom", "Hollow Peak", "5.23", 2012),
    ("Golden Harbor", "DS", "Sega", "Redfern Works", "9.73", 2012),
    ("Wild Vanguard", "Wii", "Take-Two Interactive", "Blue Meridian", "9.02", 2012),
    ("Neon Frontier", "PS4", "Nintendo", "Lakeside Studio", "0.53", 2020),
    ("Neon Rebellion", "XOne", "Sony Computer Entertainment", "Copperline", "8.65", 2020),
    ("Hidden Tides", "PC", "Square Enix", "Hollow Peak", "6.43", 2020),
];

pub const REVIEWS: &[ReviewRecord] = &[
    ("Neon Kingdom", Some("9.0"), Some("8.1")),
    ("Iron Quest", Some("8.5"), Some("7.9")),
    ("Lunar Legion", None, None),
    ("Twilight Rally III", Some("9.8"), Some("8.4")),
    ("Silent Citadel III", Some("9.9"), Some("8.8")),
    ("Burning Kingdom", Some("9.4"), Some("8.4")),
    ("Savage Express", Some("9.7"), Some("8.6")),
    ("Lunar Chronicle II", Some("9.5"), Some("9.1")),
    ("Endless Meridian", Some("9.3"), Some("8.5")),
    ("Ancient Vanguard III", Some("9.4"), Some("9.2")),
    ("Iron Rally", Some("9.0"), Some("8.6")),
    ("Phantom Echoes", Some("9.4"), Some("9.1")),
    ("Velvet Meridian Online", Some("9.0"), Some("8.7")),
    ("Silent Outpost Origins", Some("9.1"), Some("8.3")),
    ("Cobalt Quest", Some("8.7"), Some("7.9")),
    ("Velvet Garden", Some("9.0"), Some("8.3")),
    ("Iron Quest Deluxe", Some("8.8"), Some("7.9")),
    ("Endless Outpost Zero", Some("8.9"), Some("8.1")),
    ("Wild Horizon", Some("8.4"), Some("9.7")),
    ("Iron Circuit", Some("8.2"), Some("9.3")),
    ("Hollow Kingdom", Some("8.5"), Some("9.6")),
    ("Hollow Voyage", Some("8.1"), Some("9.4")),
    ("Rusty Horizon", Some("8.4"), Some("9.8")),
    ("Iron Circuit Zero", Some("8.2"), Some("9.2")),
    ("Crimson Garden", Some("8.4"), Some("9.6")),
    ("Hollow Vanguard Online", Some("8.2"), Some("9.4")),
    ("Sacred Legion", Some("9.6"), Some("9.5")),
    ("Hidden Garden", Some("9.2"), Some("8.9")),
    ("Last Meridian", Some("9.6"), Some("9.5")),
    ("Golden Frontier", Some("9.0"), Some("8.9")),
    ("Hidden Harbor", Some("9.6"), Some("9.5")),
    ("Hidden Dynasty", Some("9.0"), Some("8.9")),
    ("Silver Tides", Some("9.5"), Some("9.5")),
    ("Scarlet Orbit", Some("9.1"), Some("8.9")),
    ("Ancient Garden Online", Some("9.4"), Some("9.5")),
    ("Shadow Garden", Some("9.2"), Some("8.9")),
    ("Thunder Harbor", Some("8.9"), Some("8.5")),
    ("Scarlet Saga Deluxe", Some("8.7"), Some("8.1")),
    ("Ancient Circuit", Some("8.9"), Some("8.4")),
    ("Thunder Express", Some("8.7"), Some("8.2")),
    ("Scarlet Citadel", Some("9.1"), Some("8.6")),
    ("Cobalt Citadel", Some("8.5"), Some("8.0")),
    ("Sacred Harbor", Some("8.3"), Some("9.5")),
    ("Shadow Orbit Origins", Some("8.1"), Some("9.1")),
    ("Distant Run", Some("8.5"), Some("9.5")),
    ("Ancient Meridian III", Some("7.9"), Some("9.1")),
    ("Last Echoes Origins", Some("8.2"), Some("9.3")),
    ("Hidden Horizon", Some("8.9"), Some("8.1")),
    ("Shadow Circuit", Some("8.5"), Some("7.9")),
    ("Neon Meridian", Some("9.0"), Some("8.3")),
    ("Distant Horizon", Some("8.4"), Some("7.7")),
    ("Sacred Circuit III", Some("8.7"), Some("8.0")),
    ("Rusty Dynasty Origins", Some("9.2"), Some("9.1")),
    ("Crimson Harbor", Some("9.0"), Some("8.9")),
    ("Hidden Crown", Some("9.4"), Some("9.3")),
    ("Burning Saga III", Some("8.8"), Some("8.7")),
    ("Hollow Tides III", Some("9.2"), Some("9.3")),
    ("Neon Orbit", Some("8.8"), Some("8.7")),
    ("Silent Tactics", Some("9.3"), Some("9.2")),
    ("Rusty Rally", Some("8.7"), Some("8.8")),
    ("Broken Garden", Some("8.3"), Some("9.2")),
    ("Thunder Legion", Some("7.9"), Some("9.0")),
    ("Emerald Express", Some("8.2"), Some("9.2")),
    ("Phantom Express III", Some("8.0"), Some("9.0")),
    ("Silent Rebellion Online", Some("8.4"), Some("9.2")),
    ("Crimson Rebellion", Some("7.8"), Some("9.0")),
    ("Last Voyage Origins", Some("9.3"), Some("8.5")),
    ("Cobalt Garden", Some("8.9"), Some("7.9")),
    ("Endless Crown", Some("9.3"), Some("8.5")),
    ("Radiant Express", Some("9.0"), Some("7.9")),
    ("Twilight Odyssey II", Some("9.5"), Some("8.5")),
    ("Distant Echoes III", Some("8.9"), Some("7.9")),
    ("Phantom Kingdom", Some("8.3"), Some("9.0")),
    ("Sacred Frontier", Some("7.7"), Some("8.8")),
    ("Golden Outpost", Some("8.2"), Some("9.1")),
    ("Endless Reckoning", Some("7.8"), Some("8.7")),
    ("Neon Reckoning Deluxe", Some("8.0"), Some("8.9")),
    ("Wii Sports", Some("8.9"), Some("8.0")),
    ("Phantom Rebellion III", Some("8.3"), Some("7.8")),
    ("Silver Outpost", Some("8.8"), Some("8.0")),
    ("Wild Kingdom", Some("8.4"), Some("7.8")),
    ("Lunar Garden", Some("8.9"), Some("8.0")),
    ("Hollow Legion", Some("8.3"), Some("7.8")),
    ("Burning Meridian II", Some("8.6"), Some("7.9")),
    ("Frozen Frontier", Some("9.0"), Some("8.8")),
    ("Silent Circuit Deluxe", Some("8.6"), Some("8.6")),
    ("Savage Crown", Some("9.1"), Some("9.0")),
    ("Distant Crown", Some("8.5"), Some("8.4")),
    ("Ancient Run Deluxe", Some("8.9"), Some("9.0")),
    ("Thunder Tides", Some("8.7"), Some("8.4")),
    ("Radiant Odyssey Zero", Some("8.8"), Some("8.7")),
    ("Rusty Garden", None, None),
    ("Broken Horizon", Some("9.2"), Some("9.0")),
    ("Twilight Kingdom Zero", Some("8.6"), Some("8.6")),
    ("Burning Circuit Zero", Some("9.1"), Some("8.9")),
    ("Silver Crown", Some("8.7"), Some("8.7")),
    ("Velvet Citadel", Some("9.2"), Some("9.1")),
    ("Distant Circuit Online", Some("8.7"), Some("8.5")),
    ("Hollow Dynasty", Some("9.1"), Some("9.1")),
    ("Neon Citadel Deluxe", Some("8.9"), Some("8.5")),
    ("Ancient Circuit Online", Some("9.1"), Some("9.1")),
    ("Shadow Orbit", Some("8.9"), Some("8.5")),
    ("Phantom Voyage", Some("8.6"), Some("8.1")),
    ("Wild Rebellion", Some("8.4"), Some("7.5")),
    ("Broken Vanguard", Some("8.6"), Some("7.9")),
    ("Broken Legion", Some("8.4"), Some("7.7")),
    ("Scarlet Reckoning", Some("8.8"), Some("8.1")),
    ("Broken Crown", Some("8.2"), Some("7.5")),
    ("Scarlet Dynasty", Some("8.9"), Some("8.7")),
    ("Twilight Odyssey", Some("8.8"), Some("8.5")),
    ("Crimson Chronicle", Some("9.0"), Some("8.7")),
    ("Shadow Orbit II", Some("8.8"), Some("8.5")),
    ("Phantom Express Origins", Some("8.9"), Some("8.7")),
    ("Sacred Tactics", None, Some("8.5")),
    ("Silver Orbit III", None, None),
    ("Silver Horizon Zero", Some("8.7"), Some("7.9")),
    ("Feral Legion", Some("8.1"), Some("7.5")),
    ("Endless Vanguard", Some("8.7"), Some("7.9")),
    ("Crimson Garden Deluxe", Some("8.1"), Some("7.5")),
    ("Endless Tides", Some("8.4"), Some("7.7")),
    ("Crimson Vanguard", Some("7.7"), Some("8.6")),
    ("Distant Orbit", Some("7.5"), Some("8.4")),
    ("Iron Rally Zero", Some("7.8"), Some("8.7")),
    ("Hollow Dynasty Zero", Some("7.4"), Some("8.3")),
    ("Hollow Frontier", Some("7.6"), None),
    ("Neon Frontier", Some("9.7"), Some("7.6")),
    ("Neon Rebellion", Some("9.3"), Some("7.2")),
    ("Starlight Rally", Some("7.5"), Some("8.1")),
    ("Paper Outpost", None, Some("6.9")),
];