// Agent roles backed by the text-generation service
use crate::llm::{GenerationRequest, LlmError, TextGenerator};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AgentRole {
    Researcher,
    Planner,
    HotelRestaurantFinder,
}

impl AgentRole {
    pub fn name(&self) -> &'static str {
        match self {
            AgentRole::Researcher => "Researcher",
            AgentRole::Planner => "Planner",
            AgentRole::HotelRestaurantFinder => "Hotel & Restaurant Finder",
        }
    }

    pub fn instructions(&self) -> &'static [&'static str] {
        match self {
            AgentRole::Researcher => &[
                "Identify the travel destination specified by the user.",
                "Gather detailed information on the destination, including climate, culture, and safety tips.",
                "Find popular attractions, landmarks, and must-visit places.",
                "Search for activities that match the user's interests and travel style.",
                "Provide well-structured summaries with key insights and recommendations.",
            ],
            AgentRole::Planner => &[
                "Gather details about the user's travel preferences and budget.",
                "Create a detailed itinerary with scheduled activities and estimated costs.",
                "Ensure the itinerary includes transportation options and travel time estimates.",
                "Present the itinerary in a structured format.",
            ],
            AgentRole::HotelRestaurantFinder => &[
                "Identify key locations in the user's travel itinerary.",
                "Search for highly rated hotels near those locations.",
                "Search for top-rated restaurants based on cuisine preferences and proximity.",
                "Provide direct booking links or reservation options where possible.",
            ],
        }
    }
}

impl fmt::Display for AgentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentReply {
    pub role: AgentRole,
    pub content: String,
}

pub struct TravelAgent {
    role: AgentRole,
    model: String,
    temperature: f32,
    generator: Arc<dyn TextGenerator>,
}

impl TravelAgent {
    pub fn new(
        role: AgentRole,
        model: impl Into<String>,
        temperature: f32,
        generator: Arc<dyn TextGenerator>,
    ) -> Self {
        Self {
            role,
            model: model.into(),
            temperature,
            generator,
        }
    }

    pub fn role(&self) -> AgentRole {
        self.role
    }

    pub async fn run(&self, prompt: &str) -> Result<AgentReply, LlmError> {
        info!(agent = %self.role, "Running agent");
        let request = GenerationRequest {
            system: system_instruction(self.role, Local::now()),
            prompt: prompt.to_string(),
            model: self.model.clone(),
            temperature: self.temperature,
        };

        let content = self.generator.generate(request).await?;
        Ok(AgentReply {
            role: self.role,
            content,
        })
    }
}

// Role name, bulleted instructions, then the current date and time so the
// model can reason about seasons and upcoming dates
pub fn system_instruction(role: AgentRole, now: DateTime<Local>) -> String {
    let mut system = format!("You are {}.\n\n<instructions>\n", role.name());
    for line in role.instructions() {
        system.push_str("- ");
        system.push_str(line);
        system.push('\n');
    }
    system.push_str("</instructions>\n\n");
    system.push_str(&format!(
        "The current time is {}.",
        now.format("%Y-%m-%d %H:%M:%S %:z")
    ));
    system
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct RecordingGenerator {
        requests: Mutex<Vec<GenerationRequest>>,
    }

    #[async_trait]
    impl TextGenerator for RecordingGenerator {
        async fn generate(&self, request: GenerationRequest) -> Result<String, LlmError> {
            let reply = format!("echo: {}", request.prompt);
            self.requests.lock().push(request);
            Ok(reply)
        }
    }

    #[test]
    fn test_system_instruction_layout() {
        let now = Local.with_ymd_and_hms(2025, 6, 1, 9, 30, 0).unwrap();
        let system = system_instruction(AgentRole::Planner, now);

        assert!(system.starts_with("You are Planner.\n\n<instructions>\n- Gather details"));
        assert_eq!(system.matches("\n- ").count(), 4);
        assert!(system.contains("The current time is 2025-06-01 09:30:00"));
    }

    #[test]
    fn test_every_role_has_instructions() {
        for role in [
            AgentRole::Researcher,
            AgentRole::Planner,
            AgentRole::HotelRestaurantFinder,
        ] {
            assert!(!role.instructions().is_empty(), "{} has no instructions", role);
        }
    }

    #[tokio::test]
    async fn test_run_passes_model_and_prompt() {
        let generator = Arc::new(RecordingGenerator::default());
        let agent = TravelAgent::new(
            AgentRole::HotelRestaurantFinder,
            "gemini-2.0-flash-exp",
            0.7,
            generator.clone(),
        );

        let reply = agent.run("Find hotels in DEL").await.unwrap();

        assert_eq!(reply.role, AgentRole::HotelRestaurantFinder);
        assert_eq!(reply.content, "echo: Find hotels in DEL");

        let requests = generator.requests.lock();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].model, "gemini-2.0-flash-exp");
        assert!(requests[0]
            .system
            .starts_with("You are Hotel & Restaurant Finder."));
    }
}
