//! # UK Tide Station Directory
//!
//! A fixed table of UK tide stations with simple name/region search and a
//! nearest-station lookup for a device position.
//!
//! ## Nearest Station
//! Distances use the Haversine great-circle formula on a spherical Earth
//! (radius 6371 km). The scan is linear; on equal distance the station listed
//! first wins.

use serde::Serialize;

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct TideStation {
    /// Admiralty station id, e.g. `"0113"`
    pub id: &'static str,
    pub name: &'static str,
    pub region: &'static str,
    pub latitude: f64,
    pub longitude: f64,
}

const fn station(
    id: &'static str,
    name: &'static str,
    region: &'static str,
    latitude: f64,
    longitude: f64,
) -> TideStation {
    TideStation {
        id,
        name,
        region,
        latitude,
        longitude,
    }
}

/// Every station the app knows about.
pub static UK_TIDE_STATIONS: &[TideStation] = &[
    // Thames Estuary
    station("0113", "London Bridge", "River Thames", 51.5081, -0.0875),
    station("0112", "Tilbury", "River Thames", 51.4500, 0.3500),
    station("0114", "Silvertown", "River Thames", 51.5027, 0.0123),
    station("0111", "Sheerness", "River Thames", 51.4463, 0.7488),

    // Kent & Sussex
    station("0068", "Dover", "Kent", 51.1279, 1.3134),
    station("0069", "Deal", "Kent", 51.2233, 1.4042),
    station("0065", "Folkestone", "Kent", 51.0813, 1.1795),
    station("0066", "Ramsgate", "Kent", 51.3333, 1.4167),
    station("0067", "Margate", "Kent", 51.3917, 1.3867),
    station("0054", "Brighton Marina", "Sussex", 50.8147, -0.1030),
    station("0055", "Newhaven", "Sussex", 50.7925, 0.0550),
    station("0056", "Eastbourne", "Sussex", 50.7687, 0.2918),
    station("0057", "Hastings", "Sussex", 50.8552, 0.5832),
    station("0053", "Selsey Bill", "Sussex", 50.7242, -0.7900),
    station("0052", "Littlehampton", "Sussex", 50.8053, -0.5453),
    station("0051", "Shoreham", "Sussex", 50.8322, -0.2745),

    // Hampshire & Isle of Wight
    station("0032", "Portsmouth", "Hampshire", 50.7989, -1.1091),
    station("0034", "Southampton", "Hampshire", 50.8997, -1.4044),
    station("0035", "Calshot", "Hampshire", 50.8167, -1.3083),
    station("0036", "Cowes", "Isle of Wight", 50.7592, -1.2917),
    station("0037", "Ryde", "Isle of Wight", 50.7333, -1.1583),
    station("0038", "Ventnor", "Isle of Wight", 50.5947, -1.2083),

    // Devon & Cornwall
    station("0012", "Plymouth", "Devon", 50.3719, -4.1422),
    station("0014", "Devonport", "Devon", 50.3686, -4.1853),
    station("0015", "Torquay", "Devon", 50.4619, -3.5253),
    station("0016", "Exmouth", "Devon", 50.6181, -3.4133),
    station("0017", "Teignmouth", "Devon", 50.5469, -3.4947),
    station("0018", "Falmouth", "Cornwall", 50.1536, -5.0683),
    station("0019", "Newquay", "Cornwall", 50.4155, -5.0828),
    station("0020", "Padstow", "Cornwall", 50.5411, -4.9353),
    station("0021", "Penzance", "Cornwall", 50.1181, -5.5272),

    // North West
    station("0001", "Liverpool", "Merseyside", 53.4084, -3.0072),
    station("0003", "Birkenhead", "Merseyside", 53.3947, -3.0139),
    station("0004", "Formby", "Merseyside", 53.5528, -3.0928),
    station("0005", "Blackpool", "Lancashire", 53.8175, -3.0536),

    // Scotland
    station("0152", "Aberdeen", "Scotland", 57.1433, -2.0933),
    station("0157", "Leith", "Scotland", 55.9778, -3.1703),
    station("0158", "Dundee", "Scotland", 56.4633, -2.9667),
    station("0159", "Glasgow", "Scotland", 55.8603, -4.2517),
    station("0160", "Greenock", "Scotland", 55.9553, -4.7553),
    station("0161", "Oban", "Scotland", 56.4133, -5.4733),
    station("0162", "Ullapool", "Scotland", 57.8967, -5.1633),

    // Wales
    station("0175", "Cardiff", "Wales", 51.4545, -3.1683),
    station("0176", "Newport", "Wales", 51.5500, -2.9833),
    station("0177", "Barry", "Wales", 51.3967, -3.2683),
    station("0178", "Port Talbot", "Wales", 51.5900, -3.8183),
    station("0181", "Swansea", "Wales", 51.6214, -3.9436),
    station("0182", "Milford Haven", "Wales", 51.7125, -5.0403),
    station("0183", "Fishguard", "Wales", 52.0067, -4.9833),
    station("0184", "Holyhead", "Wales", 53.3083, -4.6333),

    // Northern Ireland
    station("0209", "Belfast", "Northern Ireland", 54.5972, -5.9303),
    station("0210", "Bangor", "Northern Ireland", 54.6667, -5.6667),
    station("0211", "Londonderry", "Northern Ireland", 54.9967, -7.3103),
    station("0212", "Portrush", "Northern Ireland", 55.2000, -6.7167),

    // East Coast
    station("0081", "Harwich", "Essex", 51.9456, 1.2867),
    station("0082", "Felixstowe", "Suffolk", 51.9567, 1.3511),
    station("0083", "Lowestoft", "Suffolk", 52.4750, 1.7500),
    station("0084", "Great Yarmouth", "Norfolk", 52.5833, 1.7333),
    station("0085", "Cromer", "Norfolk", 52.9333, 1.3000),
    station("0086", "Kings Lynn", "Norfolk", 52.7517, 0.3933),
    station("0087", "Grimsby", "Lincolnshire", 53.5667, -0.0667),
    station("0088", "Hull", "Yorkshire", 53.7433, -0.3333),
    station("0089", "Whitby", "Yorkshire", 54.4833, -0.6167),
    station("0090", "Scarborough", "Yorkshire", 54.2833, -0.4000),
];

/// Stations whose name or region contains `query`, ignoring case.
/// A blank query matches nothing.
pub fn search(query: &str) -> Vec<&'static TideStation> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }
    UK_TIDE_STATIONS
        .iter()
        .filter(|s| {
            s.name.to_lowercase().contains(&query) || s.region.to_lowercase().contains(&query)
        })
        .collect()
}

pub fn find_by_id(id: &str) -> Option<&'static TideStation> {
    UK_TIDE_STATIONS.iter().find(|s| s.id == id.trim())
}

/// Look a station up by exact id, then by exact name ignoring case.
pub fn resolve(id_or_name: &str) -> Option<&'static TideStation> {
    find_by_id(id_or_name).or_else(|| {
        let wanted = id_or_name.trim();
        UK_TIDE_STATIONS
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(wanted))
    })
}

/// Great-circle distance in kilometres between two points in degrees.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

/// The station closest to `(latitude, longitude)`, or `None` if `stations`
/// is empty.
pub fn find_nearest(
    latitude: f64,
    longitude: f64,
    stations: &[TideStation],
) -> Option<&TideStation> {
    let mut best: Option<(&TideStation, f64)> = None;
    for candidate in stations {
        let distance = haversine_km(latitude, longitude, candidate.latitude, candidate.longitude);
        if best.map_or(true, |(_, shortest)| distance < shortest) {
            best = Some((candidate, distance));
        }
    }
    best.map(|(station, _)| station)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_known_distances() {
        assert_eq!(haversine_km(51.5, 0.0, 51.5, 0.0), 0.0);

        // One degree of latitude is about 111.2 km
        let degree = haversine_km(50.0, -1.0, 51.0, -1.0);
        assert!((degree - 111.19).abs() < 0.1, "got {degree}");

        // London Bridge to Dover, roughly 105 km
        let london = find_by_id("0113").unwrap();
        let dover = find_by_id("0068").unwrap();
        let d = haversine_km(london.latitude, london.longitude, dover.latitude, dover.longitude);
        assert!((95.0..=115.0).contains(&d), "got {d}");
    }

    #[test]
    fn test_nearest_picks_closest() {
        let stations = [
            station("A", "Thames", "East", 51.5, 0.0),
            station("B", "Cornwall", "West", 50.0, -5.0),
        ];
        let first = haversine_km(51.4, 0.1, 51.5, 0.0);
        let second = haversine_km(51.4, 0.1, 50.0, -5.0);
        assert!(first < second);
        assert_eq!(find_nearest(51.4, 0.1, &stations).map(|s| s.id), Some("A"));
    }

    #[test]
    fn test_nearest_empty_and_ties() {
        assert!(find_nearest(51.4, 0.1, &[]).is_none());

        let twins = [
            station("A", "One", "R", 51.0, 0.0),
            station("B", "Two", "R", 51.0, 0.0),
        ];
        assert_eq!(find_nearest(52.0, 0.0, &twins).map(|s| s.id), Some("A"));
    }

    #[test]
    fn test_nearest_in_directory() {
        // Standing on Margate seafront
        let nearest = find_nearest(51.39, 1.38, UK_TIDE_STATIONS).unwrap();
        assert_eq!(nearest.name, "Margate");
    }

    #[test]
    fn test_search_by_name_and_region() {
        let names: Vec<&str> = search("dover").iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["Dover"]);

        let welsh = search("WALES");
        assert_eq!(welsh.len(), 8);
        assert!(welsh.iter().all(|s| s.region == "Wales"));

        assert!(search("").is_empty());
        assert!(search("   ").is_empty());
        assert!(search("atlantis").is_empty());
    }

    #[test]
    fn test_resolve_by_id_or_name() {
        assert_eq!(resolve("0113").map(|s| s.name), Some("London Bridge"));
        assert_eq!(resolve("london bridge").map(|s| s.id), Some("0113"));
        assert!(resolve("Nowhere").is_none());
    }

    #[test]
    fn test_directory_ids_are_unique() {
        assert_eq!(UK_TIDE_STATIONS.len(), 64);
        let mut ids: Vec<&str> = UK_TIDE_STATIONS.iter().map(|s| s.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), UK_TIDE_STATIONS.len());
    }
}
