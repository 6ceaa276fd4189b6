use dotenv::dotenv;
use gemini_imagegen::{
    models::{Content, GenerationConfig, Request, ResponseModality},
    GenerativeModel, ResponseSink,
};

const MODEL: &str = "gemini-2.5-flash-image";
const PROMPT: &str = "add the title please";
const SYSTEM_INSTRUCTION: &str = "40-page list of \u{201c}Bold & Easy\u{201d} animal designs is finalized.\n\nAll pages should be created on 8.5 x 8.5\" canvas, bold/thick outlines, single animal per page, simple or minimal background.\n\nFinalized Animal List for Interior:\n\nPlayful puppy\nCurious kitten\nSmiling cow\nSleepy pig\nHappy horse\nFriendly sheep\nFluffy bunny\nProud rooster\nGentle duck\nWise owl\nAdorable chick\nCheery lion\nJungle elephant\nFunny monkey\nChill sloth\nSnuggly panda\nClever fox\nBrave tiger\nPatient turtle\nColorful parrot\nProud peacock\nShy deer\nMajestic giraffe\nHappy bear\nLively squirrel\nPlayful dolphin\nSpiky hedgehog\nJoyful penguin\nSmiling shark\nFriendly raccoon\nCheeky goat\nHappy llama\nElegant flamingo\nCuddly koala\nMagical unicorn-cat (hybrid)\nDinosaur-dog (hybrid)\nCow-corn (cow-unicorn hybrid)\nPig-a-saurus (pig-dinosaur hybrid)\nCat-mander (cat salamander hybrid)\nBonus: Animal dance party (group, simple)";

#[tokio::main]
async fn main() {
    dotenv().ok();

    let model = match GenerativeModel::from_env(MODEL) {
        Ok(model) => model,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    let request = Request::builder()
        .system_instruction(Some(SYSTEM_INSTRUCTION.into()))
        .generation_config(Some(
            GenerationConfig::builder()
                .response_modalities(Some(vec![
                    ResponseModality::Image,
                    ResponseModality::Text,
                ]))
                .build(),
        ))
        .contents(vec![Content::user_text(PROMPT)])
        .build();

    let stream = match model.stream_generate_content(request).await {
        Ok(stream) => stream,
        Err(e) => {
            eprintln!("Error during content generation: {}", e);
            std::process::exit(1);
        }
    };

    ResponseSink::stdio().consume(stream).await;
}
