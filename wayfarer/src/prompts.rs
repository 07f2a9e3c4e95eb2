//! Prompt text for the decide and recommend phases.

use crate::state::TripRequest;

/// Leading words of every trip request prompt.
///
/// The recommendation step's fallback scan skips messages starting with this marker so the
/// user's own request is never mistaken for the model's travel options.
pub const TRIP_PROMPT_MARKER: &str = "I want to travel";

/// Heading the recommendation must contain.
pub const RECOMMENDATION_HEADING: &str = "**Recommended Travel Mode:**";

/// Default system prompt for the decide phase.
pub const SYSTEM_PROMPT: &str = r#"You are an intelligent Travel Information Assistant designed to provide comprehensive travel suggestions and recommendations.

When a user provides their travel details (departure city, destination city, and purpose of travel), analyze whether an airport is present in this information and provide:

1. **Travel Options**: Suggest multiple transportation modes including:
- Flight options (if applicable)
- Train services
- Bus/Coach services
- Car rental or driving options
- Bike/Cycling routes (if suitable)

2. **Key Information to Include**:
- Estimated travel time for each option
- Approximate cost range
- Comfort and convenience levels
- Best time to travel based on the destination
- Weather considerations

3. **Purpose-Based Recommendations**:
- For Business: Prioritize quick, reliable, and professional options
- For Emergency: Suggest fastest available options
- For Family Visit: Consider comfort and affordability
- For Tourism: Highlight scenic routes and experiences
- For Other purposes: Provide balanced recommendations

4. **Additional Helpful Details**:
- Best booking platforms or channels
- Seasonal considerations and peak times
- Safety and health requirements
- Visa or documentation if crossing borders
- Local transportation at the destination
- Budget tips and cost-saving options

5. **Format Your Response**:
- Be clear and organized
- Use bullet points for easy reading
- Prioritize recommendations based on the travel purpose
- Provide actionable advice"#;

/// System instruction for the recommendation model call.
pub const RECOMMENDER_SYSTEM_PROMPT: &str = "You are a travel mode recommendation expert. Based on weather conditions and travel purpose, recommend the single best travel option.";

/// User prompt opening a trip conversation. Always starts with [`TRIP_PROMPT_MARKER`].
pub fn trip_prompt(request: &TripRequest) -> String {
    format!(
        "{TRIP_PROMPT_MARKER} to {destination} from {departure}.
The purpose of my travel is {purpose}.

Please use the weather_forecast tool to get current weather information for both cities.
Then provide comprehensive travel suggestions including:
- Current weather conditions at both locations
- Suitable travel options (flights, trains, buses, cars, bikes)
- Travel time estimates
- Cost estimates
- Weather-aware recommendations
- Any important travel tips based on the weather conditions",
        destination = request.destination,
        departure = request.departure,
        purpose = request.purpose,
    )
}

/// Fields the recommendation prompt embeds.
#[derive(Debug, Clone, Copy)]
pub struct RecommendationInput<'a> {
    pub departure: &'a str,
    pub destination: &'a str,
    pub purpose: &'a str,
    pub weather_info: &'a str,
    pub travel_options: &'a str,
}

/// Fixed-template prompt asking for exactly one travel mode.
pub fn recommendation_prompt(input: &RecommendationInput<'_>) -> String {
    format!(
        "Based on the following information, recommend THE SINGLE BEST travel mode for this trip.

Travel Details:
- From: {departure}
- To: {destination}
- Purpose: {purpose}

Current Weather Information:
{weather}

Available Travel Options:
{options}

Your task:
1. Analyze the weather conditions at both departure and destination
2. Consider the travel purpose
3. Recommend ONLY ONE travel mode that is most suitable
4. Provide a brief explanation (3-4 sentences) of why this is the best option

Format your response as:
{RECOMMENDATION_HEADING} [MODE NAME]

**Why:** [Brief explanation considering weather and purpose]

**Key Details:**
- Estimated Time: [time]
- Estimated Cost: [cost]
- Weather Impact: [how weather affects this mode]",
        departure = input.departure,
        destination = input.destination,
        purpose = input.purpose,
        weather = input.weather_info,
        options = input.travel_options,
    )
}
