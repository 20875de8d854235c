use apcy::mk2::{
    nearest_index, Address, Button, ButtonState, ColorSelector, DeviceMode, Fader, GlobalButton,
    Input, Knob, Led, LedBehavior, Message, Output, PaletteColor, Release, RingStyle, Rgb,
    TrackButton, MODE_BYTE, PALETTE,
};
use apcy::{Channel, Error, InboundEvent, MessageKind, NoteValue, OutboundMessage, RecordingSink};

fn output() -> Output<RecordingSink> {
    let _ = env_logger::builder().is_test(true).try_init();
    Output::new(RecordingSink::new())
}

fn button_event(button: Button, kind: MessageKind, value: u8) -> InboundEvent {
    let address = button.address().unwrap();
    InboundEvent {
        kind,
        channel: address.channel,
        index: address.number,
        value,
        is_input: true,
    }
}

#[test]
fn documented_scenarios() {
    let mut output = output();
    output.clip_launch(1, 1, "blue", 0).unwrap();
    output.track_knob_value(3, 64).unwrap();
    output.set_device_mode(2).unwrap();

    let sent = output.into_inner().take();
    assert_eq!(sent.len(), 3);
    assert_eq!(sent[0].to_bytes(), [0x90, 32, 45]);
    match sent[0] {
        OutboundMessage::NoteOn { value, .. } => assert_eq!(value.normalized(), 45.0 / 127.0),
        ref other => panic!("unexpected {:?}", other),
    }
    assert_eq!(
        sent[1],
        OutboundMessage::ControlChange {
            channel: Channel::new(1).unwrap(),
            controller: 0x32,
            value: 64,
        }
    );
    assert_eq!(sent[2].to_bytes()[MODE_BYTE], 0x42);
}

#[test]
fn every_button_round_trips_through_the_decoder() {
    for button in Button::all() {
        let press = button_event(button, MessageKind::NoteOn, 127);
        let release = button_event(button, MessageKind::NoteOff, button.release().velocity());

        assert_eq!(Input::button_state(&press, button), ButtonState::Pressed, "{}", button);
        assert_eq!(Input::button_state(&release, button), ButtonState::Released, "{}", button);

        // the foot switch press is indistinguishable from device control button 7
        if button != Button::FOOT_SWITCH {
            assert_eq!(Input::classify(&press), Some(Message::Press { button }));
        }
        assert_eq!(Input::classify(&release), Some(Message::Release { button }));
    }
}

#[test]
fn encoded_leds_land_on_the_decoded_address() {
    let mut output = output();
    for button in Button::all() {
        let sent = match button.led() {
            Led::Palette => output.set_led_color(button, PaletteColor::GREEN, 0),
            Led::Switch | Led::Level { .. } => output.set_led(button, 1),
            Led::None => continue,
        };
        sent.unwrap();

        let address = button.address().unwrap();
        match output.sink_mut().take().as_slice() {
            [OutboundMessage::NoteOn { channel, note, .. }] => {
                assert_eq!((*channel, *note), (address.channel, address.number), "{}", button)
            }
            other => panic!("unexpected {:?} for {}", other, button),
        }
    }
}

#[test]
fn knob_rings_follow_the_knob_values() {
    let mut output = output();
    for knob in Knob::all().filter(|knob| knob.ring_address().is_some()) {
        output.knob_value(knob, 100).unwrap();

        let bytes = output.sink_mut().take()[0].to_bytes();
        let event = InboundEvent::parse(&bytes).unwrap();
        assert_eq!(Input::knob_value(&event, knob), Some(100), "{}", knob);
        assert_eq!(
            Input::classify(&event),
            Some(Message::KnobChanged { knob, value: 100 })
        );
    }
}

#[test]
fn every_fader_is_classified() {
    for fader in Fader::all() {
        let address = fader.address().unwrap();
        let event = InboundEvent {
            kind: MessageKind::ControlChange,
            channel: address.channel,
            index: address.number,
            value: 17,
            is_input: true,
        };
        assert_eq!(
            Input::classify(&event),
            Some(Message::FaderChanged { fader, value: 17 })
        );
    }
}

#[test]
fn release_velocity_depends_on_the_button() {
    let pad = Button::clip_launch(3, 4);
    let master = Button::Global(GlobalButton::Master);
    assert_eq!(pad.release(), Release::NoteOffZero);
    assert_eq!(master.release(), Release::NoteOffFull);

    assert_eq!(
        Input::button_state(&button_event(pad, MessageKind::NoteOff, 127), pad),
        ButtonState::NotApplicable
    );
    assert_eq!(
        Input::button_state(&button_event(master, MessageKind::NoteOff, 0), master),
        ButtonState::NotApplicable
    );

    let stop = Button::track(TrackButton::ClipStop, 2);
    assert_eq!(
        Input::button_state(&button_event(stop, MessageKind::NoteOff, 0), stop),
        ButtonState::Released
    );
}

#[test]
fn rejected_calls_leave_the_sink_untouched() {
    let mut output = output();

    assert!(output.clip_launch(6, 1, "red", 0).is_err());
    assert!(output.clip_launch(0, 1, "red", 0).is_err());
    assert!(output.scene_launch(0, "red", 0).is_err());
    assert!(output.switch(Button::track(TrackButton::Record, 9), true).is_err());
    assert!(output.device_knob_value(1, 9, 0).is_err());
    assert!(output.set_device_mode(3).is_err());
    assert!(output.clip_launch(1, 1, "#GG0000", 0).is_err());

    assert!(output.sink().messages().is_empty());
}

#[test]
fn color_selectors_agree() {
    let red = PaletteColor::RED;
    assert_eq!(ColorSelector::from("RED").resolve().unwrap(), red);
    assert_eq!(ColorSelector::from("red").resolve().unwrap(), red);
    assert_eq!(ColorSelector::from(5u8).resolve().unwrap(), red);
    assert_eq!(ColorSelector::from("#FF0000").resolve().unwrap(), red);
    assert_eq!(ColorSelector::from(Rgb::new(255, 0, 0)).resolve().unwrap(), red);

    assert!(matches!(
        ColorSelector::from("chartreuse").resolve(),
        Err(Error::UnknownColorName(_))
    ));
}

#[test]
fn palette_entries_match_themselves() {
    for (index, &rgb) in PALETTE.iter().enumerate() {
        let first = PALETTE.iter().position(|&entry| entry == rgb).unwrap();
        assert_eq!(nearest_index(rgb).id() as usize, first);
        if first == index {
            assert_eq!(PaletteColor::new(index as u8).unwrap().rgb(), rgb);
        }
    }
}

#[test]
fn palette_colors_are_sent_as_levels() {
    let mut output = output();
    output
        .set_led_color(Button::scene_launch(2), "#ffffff", 0)
        .unwrap();
    assert_eq!(
        output.sink().messages(),
        [OutboundMessage::NoteOn {
            channel: Channel::new(1).unwrap(),
            note: 0x53,
            value: NoteValue::Level(3),
        }]
    );
}

#[test]
fn value_types_can_cross_threads() {
    fn assert_send_sync<T: Send + Sync>() {}

    assert_send_sync::<Channel>();
    assert_send_sync::<NoteValue>();
    assert_send_sync::<OutboundMessage>();
    assert_send_sync::<InboundEvent>();
    assert_send_sync::<RecordingSink>();
    assert_send_sync::<Rgb>();
    assert_send_sync::<PaletteColor>();
    assert_send_sync::<ColorSelector<'static>>();
    assert_send_sync::<Address>();
    assert_send_sync::<Button>();
    assert_send_sync::<Knob>();
    assert_send_sync::<Fader>();
    assert_send_sync::<DeviceMode>();
    assert_send_sync::<RingStyle>();
    assert_send_sync::<LedBehavior>();
    assert_send_sync::<Message>();
    assert_send_sync::<ButtonState>();
    assert_send_sync::<Input>();
    assert_send_sync::<Output<RecordingSink>>();
}
