use serde::{Deserialize, Serialize};

/// A `[lat, lon]` pair.
pub type Coordinate = [f64; 2];

/// A named line feature. `distance` is whatever the client measured, it is
/// never derived from `coordinates`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pipe {
    pub name: String,
    pub distance: f64,
    pub coordinates: Vec<Coordinate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub name: String,
    pub color: String,
    pub coordinates: Coordinate,
}

#[derive(Debug, Deserialize)]
pub struct PipeSubmission {
    pub pipes: Vec<Pipe>,
}

#[derive(Debug, Deserialize)]
pub struct LandmarkSubmission {
    pub landmarks: Vec<Landmark>,
}

#[derive(Debug, Deserialize)]
pub struct SaveMapRequest {
    pub user_id: String,
    pub map_data: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub struct DisplaySubmission {
    pub pipes: Vec<Pipe>,
    pub landmarks: Vec<Landmark>,
}

/// Pipes and landmarks bundled for rendering.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DisplayData {
    pub pipes: Vec<Pipe>,
    pub landmarks: Vec<Landmark>,
}

impl DisplayData {
    /// Echo both lists back untouched. Does not look at any stored state.
    pub fn combine(pipes: Vec<Pipe>, landmarks: Vec<Landmark>) -> DisplayData {
        DisplayData { pipes, landmarks }
    }

    pub fn is_empty(&self) -> bool {
        self.pipes.is_empty() && self.landmarks.is_empty()
    }
}

impl From<DisplaySubmission> for DisplayData {
    fn from(submission: DisplaySubmission) -> DisplayData {
        DisplayData::combine(submission.pipes, submission.landmarks)
    }
}

/// Sum of the client supplied distances.
pub fn total_distance(pipes: &[Pipe]) -> f64 {
    pipes.iter().map(|p| p.distance).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn pipe_from_client_json() {
        let pipe: Pipe = serde_json::from_value(json!({
            "name": "A",
            "distance": 10,
            "coordinates": [[0, 0], [1.5, 2.25]]
        }))
        .unwrap();

        assert_eq!(pipe.name, "A");
        assert_eq!(pipe.distance, 10.0);
        assert_eq!(pipe.coordinates, vec![[0.0, 0.0], [1.5, 2.25]]);
    }

    #[test]
    fn pipe_with_empty_path() {
        let pipe: Pipe = serde_json::from_value(json!({
            "name": "stub",
            "distance": 0.0,
            "coordinates": []
        }))
        .unwrap();
        assert!(pipe.coordinates.is_empty());
    }

    #[test]
    fn landmark_needs_a_single_point() {
        let bad = serde_json::from_value::<Landmark>(json!({
            "name": "Tower",
            "color": "red",
            "coordinates": [[1, 2]]
        }));
        assert!(bad.is_err());

        let missing_color = serde_json::from_value::<Landmark>(json!({
            "name": "Tower",
            "coordinates": [1, 2]
        }));
        assert!(missing_color.is_err());
    }

    #[test]
    fn total_distance_sums_fields() {
        let pipes = vec![
            Pipe { name: "A".into(), distance: 10.0, coordinates: vec![] },
            Pipe { name: "B".into(), distance: 5.5, coordinates: vec![] },
        ];
        assert_eq!(total_distance(&pipes), 15.5);
        assert_eq!(total_distance(&[]), 0.0);
    }

    #[test]
    fn combine_keeps_order() {
        let pipes = vec![
            Pipe { name: "B".into(), distance: 1.0, coordinates: vec![[1.0, 1.0]] },
            Pipe { name: "A".into(), distance: 2.0, coordinates: vec![] },
        ];
        let landmarks = vec![Landmark {
            name: "Well".into(),
            color: "#00ff00".into(),
            coordinates: [3.0, 4.0],
        }];

        let data = DisplayData::combine(pipes.clone(), landmarks.clone());
        assert_eq!(data.pipes, pipes);
        assert_eq!(data.landmarks, landmarks);
        assert!(!data.is_empty());
        assert!(DisplayData::default().is_empty());
    }
}
